use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LibraryUser::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LibraryUser::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(text(LibraryUser::FirstName))
                    .col(text(LibraryUser::LastName))
                    .col(text(LibraryUser::Email))
                    .col(ColumnDef::new(LibraryUser::DateOfBirth).date().not_null())
                    .to_owned(),
            )
            .await?;

        // One user per email; repositories map violations to EmailAlreadyTaken.
        manager
            .create_index(
                Index::create()
                    .name("user_email_unique")
                    .table(LibraryUser::Table)
                    .col(LibraryUser::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LibraryUser::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LibraryUser {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    DateOfBirth,
}
