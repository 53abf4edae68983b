//! Create `users` table.
//!
//! Column widths follow the value object bounds: id 255, email 320,
//! base64 hash 54, base64 salt 34.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(string_len(Users::Id, 255).primary_key())
                    .col(string_len(Users::Email, 320).unique_key().not_null())
                    .col(string_len(Users::PasswordHash, 54).not_null())
                    .col(string_len(Users::PasswordSalt, 34).not_null())
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, Email, PasswordHash, PasswordSalt, CreatedAt }
