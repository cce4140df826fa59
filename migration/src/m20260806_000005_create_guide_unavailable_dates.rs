use sea_orm_migration::{prelude::*, schema::*};

use super::m20260806_000002_create_guides::Guide;
use super::m20260806_000004_create_bookings::Booking;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuideUnavailableDate::Table)
                    .if_not_exists()
                    .col(uuid(GuideUnavailableDate::Id).primary_key())
                    .col(uuid(GuideUnavailableDate::GuideId).not_null())
                    .col(date(GuideUnavailableDate::Date).not_null())
                    .col(uuid_null(GuideUnavailableDate::BookingId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guide_unavailable_date_guide")
                            .from(GuideUnavailableDate::Table, GuideUnavailableDate::GuideId)
                            .to(Guide::Table, Guide::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guide_unavailable_date_booking")
                            .from(GuideUnavailableDate::Table, GuideUnavailableDate::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per guide per day. This unique index is what makes
        // check-then-reserve safe under concurrency: two overlapping
        // reservations cannot both commit.
        manager
            .create_index(
                Index::create()
                    .name("idx_guide_unavailable_date_guide_date")
                    .table(GuideUnavailableDate::Table)
                    .col(GuideUnavailableDate::GuideId)
                    .col(GuideUnavailableDate::Date)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuideUnavailableDate::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum GuideUnavailableDate {
    Table,
    Id,
    GuideId,
    Date,
    BookingId,
}
