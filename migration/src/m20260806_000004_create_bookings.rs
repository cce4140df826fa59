use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20260806_000001_create_users::{User, UserRole};
use super::m20260806_000002_create_guides::Guide;
use super::m20260806_000003_create_tours::Tour;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(BookingStatus::Enum)
                    .values([
                        BookingStatus::Upcoming,
                        BookingStatus::Completed,
                        BookingStatus::Cancelled,
                        BookingStatus::AwaitingSubstitute,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(PaymentStatus::Enum)
                    .values([
                        PaymentStatus::AdvancePaid,
                        PaymentStatus::FullyPaid,
                        PaymentStatus::Refunded,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::TourId).not_null())
                    .col(uuid(Booking::GuideId).not_null())
                    .col(uuid_null(Booking::OriginalGuideId))
                    .col(uuid(Booking::UserId).not_null())
                    .col(date(Booking::StartDate).not_null())
                    .col(date(Booking::EndDate).not_null())
                    .col(integer(Booking::NumberOfTourists).not_null())
                    .col(double(Booking::TotalPrice).not_null())
                    .col(double(Booking::AdvanceAmount).not_null())
                    .col(string_len(Booking::PaymentId, 255).not_null())
                    .col(
                        ColumnDef::new(Booking::Status)
                            .custom(BookingStatus::Enum)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Booking::PaymentStatus)
                            .custom(PaymentStatus::Enum)
                            .not_null(),
                    )
                    .col(uuid_null(Booking::CancelledById))
                    .col(
                        ColumnDef::new(Booking::CancelledByRole)
                            .custom(UserRole::Enum)
                            .null(),
                    )
                    .col(string_len_null(Booking::CancelledByName, 100))
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_tour")
                            .from(Booking::Table, Booking::TourId)
                            .to(Tour::Table, Tour::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_guide")
                            .from(Booking::Table, Booking::GuideId)
                            .to(Guide::Table, Guide::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_original_guide")
                            .from(Booking::Table, Booking::OriginalGuideId)
                            .to(Guide::Table, Guide::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(BookingStatus::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(PaymentStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    TourId,
    GuideId,
    OriginalGuideId,
    UserId,
    StartDate,
    EndDate,
    NumberOfTourists,
    TotalPrice,
    AdvanceAmount,
    PaymentId,
    Status,
    PaymentStatus,
    CancelledById,
    CancelledByRole,
    CancelledByName,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum BookingStatus {
    #[sea_orm(iden = "booking_status")]
    Enum,
    #[sea_orm(iden = "upcoming")]
    Upcoming,
    #[sea_orm(iden = "completed")]
    Completed,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
    #[sea_orm(iden = "awaiting_substitute")]
    AwaitingSubstitute,
}

#[derive(DeriveIden)]
pub enum PaymentStatus {
    #[sea_orm(iden = "payment_status")]
    Enum,
    #[sea_orm(iden = "advance_paid")]
    AdvancePaid,
    #[sea_orm(iden = "fully_paid")]
    FullyPaid,
    #[sea_orm(iden = "refunded")]
    Refunded,
}
