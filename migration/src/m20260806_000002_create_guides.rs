use sea_orm_migration::{prelude::*, schema::*};

use super::m20260806_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Guide::Table)
                    .if_not_exists()
                    .col(uuid(Guide::Id).primary_key())
                    .col(uuid(Guide::UserId).not_null().unique_key())
                    .col(string_len(Guide::Name, 100).not_null())
                    .col(text_null(Guide::Photo))
                    .col(integer_null(Guide::ExperienceYears))
                    .col(text_null(Guide::Description))
                    .col(json_binary(Guide::Languages).not_null())
                    .col(boolean(Guide::IsApproved).not_null().default(false))
                    .col(boolean(Guide::ProfileComplete).not_null().default(false))
                    .col(
                        timestamp_with_time_zone(Guide::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guide_user")
                            .from(Guide::Table, Guide::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Guide::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Guide {
    Table,
    Id,
    UserId,
    Name,
    Photo,
    ExperienceYears,
    Description,
    Languages,
    IsApproved,
    ProfileComplete,
    CreatedAt,
}
