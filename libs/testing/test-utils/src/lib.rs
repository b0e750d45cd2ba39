//! Shared test utilities for the library registry crates
//!
//! - `TestDatabase`: PostgreSQL container with the schema migrated (feature: "postgres")
//! - `TestDataBuilder`: deterministic, per-test unique names and emails
//! - `assertions`: assertion helpers
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! # async fn example() {
//! let db = TestDatabase::new().await;
//! let builder = TestDataBuilder::from_test_name("my_test");
//!
//! let email = builder.email("owner");
//! # }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data derived from a seed.
///
/// Tests sharing one database stay apart by seeding from their own name.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name, so the same test always gets the same data.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_add_user");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// An address unique to this builder and `tag`, valid for the email rules.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let email = TestDataBuilder::new(7).email("reader");
    /// assert_eq!(email, "reader.7@library-test.pl");
    /// ```
    pub fn email(&self, tag: &str) -> String {
        format!("{}.{}@library-test.pl", tag, self.seed)
    }

    /// A name unique to this builder, e.g. `"Test-12345-main"`.
    pub fn name(&self, suffix: &str) -> String {
        format!("Test-{}-{}", self.seed, suffix)
    }

    /// A birth year between 1940 and 2009 picked from the seed.
    pub fn birth_year(&self) -> i32 {
        1940 + (self.seed % 70) as i32
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that `ids` are strictly increasing
    pub fn assert_ascending_ids(ids: &[i64], context: &str) {
        assert!(
            ids.windows(2).all(|w| w[0] < w[1]),
            "{}: expected ascending ids, got {:?}",
            context,
            ids
        );
    }
}
