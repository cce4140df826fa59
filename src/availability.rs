//! The availability ledger: one row per (guide, calendar day). Reserve and
//! release are driven by the same inclusive date expansion, so a release
//! removes exactly what the matching reserve added.
//!
//! All operations take any `ConnectionTrait` so the lifecycle manager can
//! run check + reserve + booking insert inside one transaction. Even if two
//! requests pass the free-check concurrently, the unique (guide_id, date)
//! index lets only one insert commit; the loser maps to `Conflict` and its
//! transaction rolls back.

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::guide_unavailable_date::{self, Entity as UnavailableDate};
use crate::error::{AppError, AppResult};

pub async fn is_range_free<C: ConnectionTrait>(
    conn: &C,
    guide_id: Uuid,
    dates: &[NaiveDate],
) -> AppResult<bool> {
    let reserved = UnavailableDate::find()
        .filter(guide_unavailable_date::Column::GuideId.eq(guide_id))
        .filter(guide_unavailable_date::Column::Date.is_in(dates.iter().copied()))
        .count(conn)
        .await?;

    Ok(reserved == 0)
}

pub async fn reserve<C: ConnectionTrait>(
    conn: &C,
    guide_id: Uuid,
    booking_id: Option<Uuid>,
    dates: &[NaiveDate],
) -> AppResult<()> {
    let rows = dates
        .iter()
        .map(|d| guide_unavailable_date::ActiveModel {
            id: Set(Uuid::new_v4()),
            guide_id: Set(guide_id),
            date: Set(*d),
            booking_id: Set(booking_id),
        })
        .collect::<Vec<_>>();

    UnavailableDate::insert_many(rows)
        .exec(conn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
                "Sorry, the guide is no longer available for these dates.".to_string(),
            ),
            _ => e.into(),
        })?;

    Ok(())
}

pub async fn release<C: ConnectionTrait>(
    conn: &C,
    guide_id: Uuid,
    dates: &[NaiveDate],
) -> AppResult<u64> {
    let result = UnavailableDate::delete_many()
        .filter(guide_unavailable_date::Column::GuideId.eq(guide_id))
        .filter(guide_unavailable_date::Column::Date.is_in(dates.iter().copied()))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

/// Dates the guide blocked out themselves (no booking attached). Replaced
/// wholesale by the guide's availability endpoint; booking-held dates are
/// never touched by it.
pub async fn replace_personal_blocks<C: ConnectionTrait>(
    conn: &C,
    guide_id: Uuid,
    dates: &[NaiveDate],
) -> AppResult<()> {
    UnavailableDate::delete_many()
        .filter(guide_unavailable_date::Column::GuideId.eq(guide_id))
        .filter(guide_unavailable_date::Column::BookingId.is_null())
        .exec(conn)
        .await?;

    if dates.is_empty() {
        return Ok(());
    }

    let rows = dates
        .iter()
        .map(|d| guide_unavailable_date::ActiveModel {
            id: Set(Uuid::new_v4()),
            guide_id: Set(guide_id),
            date: Set(*d),
            booking_id: Set(None),
        })
        .collect::<Vec<_>>();

    UnavailableDate::insert_many(rows)
        .exec(conn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(
                "One of these dates is already reserved by a booking.".to_string(),
            ),
            _ => e.into(),
        })?;

    Ok(())
}

/// All reserved dates for a guide, for the profile/availability views.
pub async fn reserved_dates<C: ConnectionTrait>(
    conn: &C,
    guide_id: Uuid,
) -> AppResult<Vec<NaiveDate>> {
    let mut dates: Vec<NaiveDate> = UnavailableDate::find()
        .filter(guide_unavailable_date::Column::GuideId.eq(guide_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|row| row.date)
        .collect();

    dates.sort();
    Ok(dates)
}
