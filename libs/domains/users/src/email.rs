use regex::Regex;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$")
        .expect("email pattern is a valid regex")
});

/// Syntactic check for email addresses.
///
/// Accepts `local@domain.tld` where the local part uses letters, digits and
/// `_ . + -`, the first domain label letters, digits and `-`, and the rest
/// letters, digits, `-` and `.`. No DNS or deliverability checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl EmailValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn is_valid(&self, candidate: &str) -> bool {
        EMAIL_REGEX.is_match(candidate)
    }
}
