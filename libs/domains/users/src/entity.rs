use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::entity::prelude::*;

use crate::models::{CreateUser, User};

/// Sea-ORM entity for the `library_user` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "library_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub first_name: String,
    #[sea_orm(column_type = "Text")]
    pub last_name: String,
    #[sea_orm(column_type = "Text", unique)]
    pub email: String,
    pub date_of_birth: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            date_of_birth: model.date_of_birth,
        }
    }
}

// Insert: the id comes from the BIGSERIAL sequence.
impl From<CreateUser> for ActiveModel {
    fn from(input: CreateUser) -> Self {
        ActiveModel {
            id: NotSet,
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            date_of_birth: Set(input.date_of_birth),
        }
    }
}

// Update: only the mutable columns are written.
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        ActiveModel {
            id: Unchanged(user.id),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            email: Set(user.email),
            date_of_birth: Unchanged(user.date_of_birth),
        }
    }
}
