use std::sync::Arc;

use crate::email::EmailValidator;
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;

/// Business rules for library users.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    email_validator: EmailValidator,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_validator(repository, EmailValidator::new())
    }

    pub fn with_validator(repository: R, email_validator: EmailValidator) -> Self {
        Self {
            repository: Arc::new(repository),
            email_validator,
        }
    }

    /// Every stored user, in store order
    #[tracing::instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.find_all().await
    }

    /// Registers a new user.
    ///
    /// A taken email is reported before a malformed one.
    #[tracing::instrument(skip(self, candidate), fields(email = %candidate.email))]
    pub async fn add_user(&self, candidate: CreateUser) -> UserResult<User> {
        if self
            .repository
            .find_by_email(&candidate.email)
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyTaken);
        }

        if !self.email_validator.is_valid(&candidate.email) {
            return Err(UserError::InvalidEmail);
        }

        self.repository.save(candidate).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> UserResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(UserError::UserNotFound(id));
        }

        self.repository.delete_by_id(id).await
    }

    /// Applies the provided fields to user `id`.
    ///
    /// Names are overwritten when present and different. The email is
    /// overwritten only when it is well formed, different and not owned by
    /// anyone else; a malformed email is ignored. Nothing is written when no
    /// field changes or when the email is taken.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_user(&self, id: i64, changes: UpdateUser) -> UserResult<User> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::UserNotFound(id))?;

        let mut changed = false;

        if let Some(first_name) = changes.first_name {
            if first_name != user.first_name {
                user.first_name = first_name;
                changed = true;
            }
        }

        if let Some(last_name) = changes.last_name {
            if last_name != user.last_name {
                user.last_name = last_name;
                changed = true;
            }
        }

        if let Some(email) = changes.email {
            if self.email_validator.is_valid(&email) && email != user.email {
                if self.repository.find_by_email(&email).await?.is_some() {
                    return Err(UserError::EmailAlreadyTaken);
                }
                user.email = email;
                changed = true;
            }
        }

        if !changed {
            return Ok(user);
        }

        self.repository.update(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn birth_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 3, 10).unwrap()
    }

    fn rafal() -> User {
        User {
            id: 1,
            first_name: "Rafał".into(),
            last_name: "Nowak".into(),
            email: "rafiki@gmail.com".into(),
            date_of_birth: birth_date(),
        }
    }

    fn antoni() -> User {
        User {
            id: 2,
            first_name: "Antoni".into(),
            last_name: "Kowalski".into(),
            email: "a.kowalski@gmail.com".into(),
            date_of_birth: birth_date(),
        }
    }

    fn candidate(email: &str) -> CreateUser {
        CreateUser {
            first_name: "Rafał".into(),
            last_name: "Nowak".into(),
            email: email.into(),
            date_of_birth: birth_date(),
        }
    }

    #[tokio::test]
    async fn list_users_returns_repository_contents() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_all()
            .times(1)
            .returning(|| Ok(vec![rafal(), antoni()]));

        let service = UserService::new(mock_repo);
        let users = service.list_users().await.unwrap();

        assert_eq!(users, vec![rafal(), antoni()]);
    }

    #[tokio::test]
    async fn add_user_saves_candidate() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_email()
            .withf(|email| email == "rafiki@gmail.com")
            .returning(|_| Ok(None));
        mock_repo
            .expect_save()
            .with(eq(candidate("rafiki@gmail.com")))
            .times(1)
            .returning(|_| Ok(rafal()));

        let service = UserService::new(mock_repo);
        let user = service.add_user(candidate("rafiki@gmail.com")).await.unwrap();

        assert_eq!(user, rafal());
    }

    #[tokio::test]
    async fn add_user_rejects_taken_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_email()
            .returning(|_| Ok(Some(rafal())));
        mock_repo.expect_save().never();

        let service = UserService::new(mock_repo);
        let result = service.add_user(candidate("rafiki@gmail.com")).await;

        assert_eq!(result, Err(UserError::EmailAlreadyTaken));
    }

    #[tokio::test]
    async fn add_user_rejects_invalid_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_email().returning(|_| Ok(None));
        mock_repo.expect_save().never();

        let service = UserService::new(mock_repo);
        let result = service.add_user(candidate("r.nowak")).await;

        assert_eq!(result, Err(UserError::InvalidEmail));
    }

    #[tokio::test]
    async fn add_user_checks_uniqueness_before_format() {
        // A malformed email that is somehow already stored reports the collision.
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_email().returning(|_| {
            Ok(Some(User {
                email: "r.nowak".into(),
                ..rafal()
            }))
        });
        mock_repo.expect_save().never();

        let service = UserService::new(mock_repo);
        let result = service.add_user(candidate("r.nowak")).await;

        assert_eq!(result, Err(UserError::EmailAlreadyTaken));
    }

    #[tokio::test]
    async fn delete_user_removes_existing_user() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_exists_by_id()
            .with(eq(1))
            .returning(|_| Ok(true));
        mock_repo
            .expect_delete_by_id()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(mock_repo);
        assert!(service.delete_user(1).await.is_ok());
    }

    #[tokio::test]
    async fn delete_user_fails_for_missing_user() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_exists_by_id()
            .with(eq(1))
            .returning(|_| Ok(false));
        mock_repo.expect_delete_by_id().never();

        let service = UserService::new(mock_repo);
        let err = service.delete_user(1).await.unwrap_err();

        assert_eq!(err, UserError::UserNotFound(1));
        assert_eq!(err.to_string(), "User with id 1 does not exists!");
    }

    #[tokio::test]
    async fn update_user_overwrites_all_fields() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(rafal())));
        mock_repo
            .expect_find_by_email()
            .withf(|email| email == "a.kowalski@gmail.com")
            .returning(|_| Ok(None));
        mock_repo
            .expect_update()
            .withf(|user| {
                user.id == 1
                    && user.first_name == "Andrzej"
                    && user.last_name == "Kowalski"
                    && user.email == "a.kowalski@gmail.com"
                    && user.date_of_birth == birth_date()
            })
            .times(1)
            .returning(Ok);

        let service = UserService::new(mock_repo);
        let user = service
            .update_user(
                1,
                UpdateUser {
                    first_name: Some("Andrzej".into()),
                    last_name: Some("Kowalski".into()),
                    email: Some("a.kowalski@gmail.com".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(user.first_name, "Andrzej");
        assert_eq!(user.last_name, "Kowalski");
        assert_eq!(user.email, "a.kowalski@gmail.com");
    }

    #[tokio::test]
    async fn update_user_rejects_email_of_other_user() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(rafal())));
        mock_repo
            .expect_find_by_email()
            .withf(|email| email == "a.kowalski@gmail.com")
            .returning(|_| Ok(Some(antoni())));
        mock_repo.expect_update().never();

        let service = UserService::new(mock_repo);
        let result = service
            .update_user(
                1,
                UpdateUser {
                    first_name: Some("Andrzej".into()),
                    last_name: Some("Kowalski".into()),
                    email: Some("a.kowalski@gmail.com".into()),
                },
            )
            .await;

        assert_eq!(result, Err(UserError::EmailAlreadyTaken));
    }

    #[tokio::test]
    async fn update_user_ignores_invalid_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(rafal())));
        mock_repo.expect_find_by_email().never();
        mock_repo
            .expect_update()
            .withf(|user| user.first_name == "Andrzej" && user.email == "rafiki@gmail.com")
            .times(1)
            .returning(Ok);

        let service = UserService::new(mock_repo);
        let user = service
            .update_user(
                1,
                UpdateUser {
                    first_name: Some("Andrzej".into()),
                    email: Some("not-an-email".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(user.email, "rafiki@gmail.com");
    }

    #[tokio::test]
    async fn update_user_without_changes_writes_nothing() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(rafal())));
        mock_repo.expect_find_by_email().never();
        mock_repo.expect_update().never();

        let service = UserService::new(mock_repo);

        let untouched = service.update_user(1, UpdateUser::default()).await.unwrap();
        assert_eq!(untouched, rafal());

        let same_values = service
            .update_user(
                1,
                UpdateUser {
                    first_name: Some("Rafał".into()),
                    last_name: Some("Nowak".into()),
                    email: Some("rafiki@gmail.com".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(same_values, rafal());
    }

    #[tokio::test]
    async fn update_user_fails_for_missing_user() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_id().returning(|_| Ok(None));
        mock_repo.expect_update().never();

        let service = UserService::new(mock_repo);
        let result = service.update_user(5, UpdateUser::default()).await;

        assert_eq!(result, Err(UserError::UserNotFound(5)));
    }
}
