use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};

use crate::entity::{self, Column, Entity};
use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, User};
use crate::repository::UserRepository;

/// PostgreSQL implementation of [`UserRepository`] on the `library_user` table.
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// The `user_email_unique` constraint is the only unique index besides the
/// primary key, so any uniqueness violation means a taken email.
fn map_db_err(err: DbErr) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::EmailAlreadyTaken,
        _ => UserError::Internal(err.to_string()),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_all(&self) -> UserResult<Vec<User>> {
        let models = Entity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let model = Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = Entity::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(Into::into))
    }

    async fn exists_by_id(&self, id: i64) -> UserResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn save(&self, input: CreateUser) -> UserResult<User> {
        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;

        tracing::info!(user_id = model.id, "Created user");
        Ok(model.into())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let id = user.id;
        let active_model: entity::ActiveModel = user.into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => UserError::UserNotFound(id),
            other => map_db_err(other),
        })?;

        tracing::info!(user_id = id, "Updated user");
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<()> {
        let result = Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(UserError::UserNotFound(id));
        }

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}
