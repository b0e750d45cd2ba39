use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, User};

/// Persistence port for users.
///
/// Email lookups are exact (case-sensitive). Implementations must reject a
/// write that would give two users the same email with
/// [`UserError::EmailAlreadyTaken`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users in id order
    async fn find_all(&self) -> UserResult<Vec<User>>;

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn exists_by_id(&self, id: i64) -> UserResult<bool>;

    /// Insert a new user; the store assigns the id
    async fn save(&self, user: CreateUser) -> UserResult<User>;

    /// Overwrite the names and email of an existing user
    async fn update(&self, user: User) -> UserResult<User>;

    async fn delete_by_id(&self, id: i64) -> UserResult<()>;
}

/// In-memory store for development and tests.
///
/// Ids come from a counter starting at 1 and are never reused.
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<BTreeMap<i64, User>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.contains_key(&id))
    }

    async fn save(&self, input: CreateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == input.email) {
            return Err(UserError::EmailAlreadyTaken);
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            date_of_birth: input.date_of_birth,
        };
        users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::EmailAlreadyTaken);
        }

        let stored = users
            .get_mut(&user.id)
            .ok_or(UserError::UserNotFound(user.id))?;
        stored.first_name = user.first_name;
        stored.last_name = user.last_name;
        stored.email = user.email;

        tracing::info!(user_id = stored.id, "Updated user");
        Ok(stored.clone())
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<()> {
        let mut users = self.users.write().await;

        users.remove(&id).ok_or(UserError::UserNotFound(id))?;

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_user(first_name: &str, last_name: &str, email: &str) -> CreateUser {
        CreateUser {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 10).unwrap(),
        }
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.save(new_user("Rafał", "Nowak", "rafiki@gmail.com")).await.unwrap();
        let second = repo
            .save(new_user("Antoni", "Kowalski", "a.kowalski@gmail.com"))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::new();
        let first = repo.save(new_user("Rafał", "Nowak", "rafiki@gmail.com")).await.unwrap();
        repo.delete_by_id(first.id).await.unwrap();

        let second = repo.save(new_user("Rafał", "Nowak", "rafiki@gmail.com")).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let repo = InMemoryUserRepository::new();
        for (i, email) in ["c@library.pl", "a@library.pl", "b@library.pl"].iter().enumerate() {
            repo.save(new_user(&format!("User{i}"), "Test", email)).await.unwrap();
        }

        let emails: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, ["c@library.pl", "a@library.pl", "b@library.pl"]);
    }

    #[tokio::test]
    async fn find_by_email_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.save(new_user("Rafał", "Nowak", "rafiki@gmail.com")).await.unwrap();

        assert!(repo.find_by_email("rafiki@gmail.com").await.unwrap().is_some());
        assert!(repo.find_by_email("Rafiki@gmail.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.save(new_user("Rafał", "Nowak", "rafiki@gmail.com")).await.unwrap();

        let result = repo.save(new_user("Andrzej", "Nowak", "rafiki@gmail.com")).await;

        assert_eq!(result, Err(UserError::EmailAlreadyTaken));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_saves_with_same_email_store_one_user() {
        let repo = InMemoryUserRepository::new();

        let attempts = (0..8).map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.save(new_user("Rafał", "Nowak", "rafiki@gmail.com")).await })
        });
        let results = futures::future::join_all(attempts).await;

        let stored = results.into_iter().filter(|r| matches!(r, Ok(Ok(_)))).count();
        assert_eq!(stored, 1);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_rejects_email_of_other_user() {
        let repo = InMemoryUserRepository::new();
        let rafal = repo.save(new_user("Rafał", "Nowak", "rafiki@gmail.com")).await.unwrap();
        repo.save(new_user("Antoni", "Kowalski", "a.kowalski@gmail.com"))
            .await
            .unwrap();

        let mut changed = rafal.clone();
        changed.email = "a.kowalski@gmail.com".into();

        assert_eq!(repo.update(changed).await, Err(UserError::EmailAlreadyTaken));
        assert_eq!(repo.find_by_id(rafal.id).await.unwrap(), Some(rafal));
    }

    #[tokio::test]
    async fn update_keeps_date_of_birth() {
        let repo = InMemoryUserRepository::new();
        let rafal = repo.save(new_user("Rafał", "Nowak", "rafiki@gmail.com")).await.unwrap();

        let mut changed = rafal.clone();
        changed.first_name = "Andrzej".into();
        changed.date_of_birth = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();

        let updated = repo.update(changed).await.unwrap();
        assert_eq!(updated.first_name, "Andrzej");
        assert_eq!(updated.date_of_birth, rafal.date_of_birth);
    }

    #[tokio::test]
    async fn delete_missing_user_fails() {
        let repo = InMemoryUserRepository::new();
        assert_eq!(repo.delete_by_id(42).await, Err(UserError::UserNotFound(42)));
    }
}
