use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability;
use crate::entities::booking::{self, BookingStatus, PaymentStatus};
use crate::entities::user::UserRole;
use crate::entities::{guide, tour, user};
use crate::error::{AppError, AppResult};
use crate::payments::GatewayOrder;
use crate::utils::dates::dates_in_range;
use crate::utils::jwt::Claims;
use crate::utils::pricing;
use crate::AppState;

// ============ Requests ============

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: f64,
    pub currency: Option<String>,
    pub receipt: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub tour_id: Uuid,
    pub guide_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub number_of_tourists: i32,
    pub payment_id: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub tour_id: Uuid,
    pub guide_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub number_of_tourists: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignSubstituteRequest {
    pub substitute_guide_id: Uuid,
}

// ============ Responses ============

#[derive(Debug, Serialize)]
pub struct BookingUserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct BookingGuideInfo {
    pub id: Uuid,
    pub name: String,
    pub photo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingTourInfo {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub images: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct BookingDetail {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub number_of_tourists: i32,
    pub total_price: f64,
    pub advance_amount: f64,
    pub payment_id: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub user: Option<BookingUserInfo>,
    pub guide: Option<BookingGuideInfo>,
    pub original_guide: Option<BookingGuideInfo>,
    pub tour: Option<BookingTourInfo>,
    pub created_at: DateTime<Utc>,
}

fn guide_info(guides: &[guide::Model], id: Uuid) -> Option<BookingGuideInfo> {
    guides.iter().find(|g| g.id == id).map(|g| BookingGuideInfo {
        id: g.id,
        name: g.name.clone(),
        photo: g.photo.clone(),
    })
}

fn to_detail(
    b: booking::Model,
    users: &[user::Model],
    guides: &[guide::Model],
    tours: &[tour::Model],
) -> BookingDetail {
    let user = users.iter().find(|u| u.id == b.user_id).map(|u| BookingUserInfo {
        id: u.id,
        name: u.name.clone(),
        email: u.email.clone(),
    });
    let tour = tours.iter().find(|t| t.id == b.tour_id).map(|t| BookingTourInfo {
        id: t.id,
        title: t.title.clone(),
        price: t.price,
        images: t.images.clone(),
    });

    BookingDetail {
        id: b.id,
        start_date: b.start_date,
        end_date: b.end_date,
        number_of_tourists: b.number_of_tourists,
        total_price: b.total_price,
        advance_amount: b.advance_amount,
        payment_id: b.payment_id,
        status: b.status,
        payment_status: b.payment_status,
        user,
        guide: guide_info(guides, b.guide_id),
        original_guide: b.original_guide_id.and_then(|id| guide_info(guides, id)),
        tour,
        created_at: b.created_at.with_timezone(&Utc),
    }
}

// ============ Booking Creation ============

struct BookingFields {
    tour_id: Uuid,
    guide_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    number_of_tourists: i32,
    payment_id: String,
}

/// Reserve the guide's dates and persist the booking in one transaction.
/// The unique index on (guide_id, date) means a concurrent booking for an
/// overlapping range cannot also commit; the loser rolls back with Conflict
/// and leaves no ledger rows behind.
async fn confirm_booking(
    state: &AppState,
    user_id: Uuid,
    fields: BookingFields,
) -> AppResult<booking::Model> {
    if fields.number_of_tourists < 1 {
        return Err(AppError::BadRequest(
            "At least one tourist is required.".to_string(),
        ));
    }

    if fields.start_date > fields.end_date {
        return Err(AppError::BadRequest(
            "Start date must not be after end date.".to_string(),
        ));
    }

    let tour = tour::Entity::find_by_id(fields.tour_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tour or guide not found.".to_string()))?;

    let guide = guide::Entity::find_by_id(fields.guide_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tour or guide not found.".to_string()))?;

    // Prices come from the catalog, never from the request body
    let total_price = pricing::total_price(tour.price, fields.number_of_tourists);
    let advance_amount = pricing::advance_amount(total_price);

    let booking_dates = dates_in_range(fields.start_date, fields.end_date);

    let txn = state.db.begin().await?;

    if !availability::is_range_free(&txn, guide.id, &booking_dates).await? {
        return Err(AppError::Conflict(
            "Sorry, the guide is no longer available for these dates.".to_string(),
        ));
    }

    let booking_id = Uuid::new_v4();
    availability::reserve(&txn, guide.id, Some(booking_id), &booking_dates).await?;

    let saved = booking::ActiveModel {
        id: Set(booking_id),
        tour_id: Set(tour.id),
        guide_id: Set(guide.id),
        original_guide_id: Set(None),
        user_id: Set(user_id),
        start_date: Set(fields.start_date),
        end_date: Set(fields.end_date),
        number_of_tourists: Set(fields.number_of_tourists),
        total_price: Set(total_price),
        advance_amount: Set(advance_amount),
        payment_id: Set(fields.payment_id),
        status: Set(BookingStatus::Upcoming),
        payment_status: Set(PaymentStatus::AdvancePaid),
        cancelled_by_id: Set(None),
        cancelled_by_role: Set(None),
        cancelled_by_name: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        booking_id = %saved.id,
        guide_id = %saved.guide_id,
        days = booking_dates.len(),
        "booking confirmed"
    );

    Ok(saved)
}

/// Create a booking against an already-collected payment
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<booking::Model>)> {
    if payload.payment_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "All booking fields are required.".to_string(),
        ));
    }

    let saved = confirm_booking(
        &state,
        claims.sub,
        BookingFields {
            tour_id: payload.tour_id,
            guide_id: payload.guide_id,
            start_date: payload.start_date,
            end_date: payload.end_date,
            number_of_tourists: payload.number_of_tourists,
            payment_id: payload.payment_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Create a gateway order for the checkout flow
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<GatewayOrder>> {
    if payload.amount <= 0.0 || payload.receipt.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Amount and receipt are required.".to_string(),
        ));
    }

    let currency = payload.currency.unwrap_or_else(|| "INR".to_string());
    let order = state
        .payments
        .create_order(
            pricing::to_minor_units(payload.amount),
            &currency,
            &payload.receipt,
        )
        .await?;

    Ok(Json(order))
}

/// Verify the gateway's checkout signature, then create the booking. A bad
/// signature rejects the request before anything is looked up or persisted.
pub async fn verify_payment_and_create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<(StatusCode, Json<booking::Model>)> {
    let genuine = crate::payments::verify_payment_signature(
        &payload.razorpay_order_id,
        &payload.razorpay_payment_id,
        &payload.razorpay_signature,
        &state.config.razorpay_key_secret,
    );

    if !genuine {
        return Err(AppError::BadRequest(
            "Payment verification failed. Invalid signature.".to_string(),
        ));
    }

    let saved = confirm_booking(
        &state,
        claims.sub,
        BookingFields {
            tour_id: payload.tour_id,
            guide_id: payload.guide_id,
            start_date: payload.start_date,
            end_date: payload.end_date,
            number_of_tourists: payload.number_of_tourists,
            payment_id: payload.razorpay_payment_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

// ============ Reads ============

fn require_admin_claims(claims: &Claims) -> AppResult<()> {
    if claims.role != UserRole::Admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

/// List all bookings, newest first (admin)
pub async fn list_all_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<BookingDetail>>> {
    require_admin_claims(&claims)?;

    let bookings = booking::Entity::find()
        .order_by_desc(booking::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let users = user::Entity::find().all(&state.db).await?;
    let guides = guide::Entity::find().all(&state.db).await?;
    let tours = tour::Entity::find().all(&state.db).await?;

    let responses = bookings
        .into_iter()
        .map(|b| to_detail(b, &users, &guides, &tours))
        .collect();

    Ok(Json(responses))
}

/// List the logged-in user's bookings, newest start date first
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<BookingDetail>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::UserId.eq(claims.sub))
        .order_by_desc(booking::Column::StartDate)
        .all(&state.db)
        .await?;

    let users = user::Entity::find().all(&state.db).await?;
    let guides = guide::Entity::find().all(&state.db).await?;
    let tours = tour::Entity::find().all(&state.db).await?;

    let responses = bookings
        .into_iter()
        .map(|b| to_detail(b, &users, &guides, &tours))
        .collect();

    Ok(Json(responses))
}

/// List bookings assigned to the logged-in guide. A caller without a guide
/// profile gets an empty list, not an error.
pub async fn guide_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<BookingDetail>>> {
    let profile = guide::Entity::find()
        .filter(guide::Column::UserId.eq(claims.sub))
        .one(&state.db)
        .await?;

    let Some(profile) = profile else {
        return Ok(Json(Vec::new()));
    };

    let bookings = booking::Entity::find()
        .filter(booking::Column::GuideId.eq(profile.id))
        .order_by_desc(booking::Column::StartDate)
        .all(&state.db)
        .await?;

    let users = user::Entity::find().all(&state.db).await?;
    let guides = guide::Entity::find().all(&state.db).await?;
    let tours = tour::Entity::find().all(&state.db).await?;

    let responses = bookings
        .into_iter()
        .map(|b| to_detail(b, &users, &guides, &tours))
        .collect();

    Ok(Json(responses))
}

/// Get a single booking with full relation expansion. Visible only to the
/// booking's owner, an admin, or the currently assigned guide.
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<BookingDetail>> {
    let booking = booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found.".to_string()))?;

    let is_owner = booking.user_id == claims.sub;
    let is_admin = claims.role == UserRole::Admin;

    let caller_profile = guide::Entity::find()
        .filter(guide::Column::UserId.eq(claims.sub))
        .one(&state.db)
        .await?;
    let is_assigned_guide = caller_profile
        .as_ref()
        .is_some_and(|p| p.id == booking.guide_id);

    if !is_owner && !is_admin && !is_assigned_guide {
        return Err(AppError::Forbidden(
            "Not authorized to view this booking.".to_string(),
        ));
    }

    let users = user::Entity::find().all(&state.db).await?;
    let guides = guide::Entity::find().all(&state.db).await?;
    let tours = tour::Entity::find().all(&state.db).await?;

    Ok(Json(to_detail(booking, &users, &guides, &tours)))
}

// ============ Status Transitions ============

/// Update a booking's status. Accepts exactly the four enumerated values.
/// Admins may set any of them; the assigned guide may record progress
/// (e.g. Completed) but only an admin may force Cancelled here, since this
/// path releases the dates without a refund. The refund flow is
/// `POST /{id}/cancel`.
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<booking::Model>> {
    let Some(new_status) = BookingStatus::parse(&payload.status) else {
        return Err(AppError::BadRequest("Invalid status provided.".to_string()));
    };

    let booking = booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found.".to_string()))?;

    let is_admin = claims.role == UserRole::Admin;
    let caller_profile = guide::Entity::find()
        .filter(guide::Column::UserId.eq(claims.sub))
        .one(&state.db)
        .await?;
    let is_assigned_guide = caller_profile
        .as_ref()
        .is_some_and(|p| p.id == booking.guide_id);

    if !is_admin && !is_assigned_guide {
        return Err(AppError::Forbidden(
            "Not authorized to update this booking.".to_string(),
        ));
    }

    if booking.status == BookingStatus::Cancelled {
        return Err(AppError::BadRequest(
            "Cancelled bookings cannot be updated.".to_string(),
        ));
    }

    if new_status == BookingStatus::Cancelled {
        if !is_admin {
            return Err(AppError::Forbidden(
                "Only an admin can cancel through a status update.".to_string(),
            ));
        }

        let booking_dates = dates_in_range(booking.start_date, booking.end_date);
        let guide_id = booking.guide_id;

        let txn = state.db.begin().await?;
        availability::release(&txn, guide_id, &booking_dates).await?;

        let mut active: booking::ActiveModel = booking.into();
        active.status = Set(BookingStatus::Cancelled);
        active.cancelled_by_id = Set(Some(claims.sub));
        active.cancelled_by_role = Set(Some(claims.role.clone()));
        active.cancelled_by_name = Set(Some(claims.name.clone()));
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        return Ok(Json(updated));
    }

    let mut active: booking::ActiveModel = booking.into();
    active.status = Set(new_status);
    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

/// Cancel an upcoming booking and refund the advance. The refund must be
/// confirmed by the gateway before any local state changes, so a gateway
/// failure leaves the booking Upcoming and the cancellation retryable.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<booking::Model>> {
    let booking = booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found.".to_string()))?;

    let is_owner = booking.user_id == claims.sub;
    let is_admin = claims.role == UserRole::Admin;
    if !is_owner && !is_admin {
        return Err(AppError::Forbidden(
            "Not authorized to cancel this booking.".to_string(),
        ));
    }

    if booking.status != BookingStatus::Upcoming {
        return Err(AppError::BadRequest(
            "Only upcoming bookings can be cancelled.".to_string(),
        ));
    }

    let payment = state.payments.fetch_payment(&booking.payment_id).await?;
    if !payment.is_captured() {
        return Err(AppError::BadRequest(
            "Payment has not been captured; nothing to refund.".to_string(),
        ));
    }

    let refund = state
        .payments
        .refund_payment(
            &booking.payment_id,
            pricing::to_minor_units(booking.advance_amount),
            "Booking cancelled",
            booking.id,
        )
        .await?;

    let booking_dates = dates_in_range(booking.start_date, booking.end_date);
    let guide_id = booking.guide_id;

    let txn = state.db.begin().await?;
    availability::release(&txn, guide_id, &booking_dates).await?;

    let mut active: booking::ActiveModel = booking.into();
    active.status = Set(BookingStatus::Cancelled);
    active.payment_status = Set(PaymentStatus::Refunded);
    active.cancelled_by_id = Set(Some(claims.sub));
    active.cancelled_by_role = Set(Some(claims.role.clone()));
    active.cancelled_by_name = Set(Some(claims.name.clone()));
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        booking_id = %updated.id,
        refund_id = %refund.id,
        "booking cancelled and advance refunded"
    );

    Ok(Json(updated))
}

/// Move a booking to a substitute guide (admin). Releases the current
/// guide's dates, reserves the substitute's, and records the original guide
/// the first time a substitution happens.
pub async fn assign_substitute(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<AssignSubstituteRequest>,
) -> AppResult<Json<booking::Model>> {
    require_admin_claims(&claims)?;

    let booking = booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found.".to_string()))?;

    if !booking.status.is_active() {
        return Err(AppError::BadRequest(
            "Only active bookings can be reassigned.".to_string(),
        ));
    }

    if payload.substitute_guide_id == booking.guide_id {
        return Err(AppError::BadRequest(
            "Substitute must differ from the current guide.".to_string(),
        ));
    }

    let substitute = guide::Entity::find_by_id(payload.substitute_guide_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Substitute guide not found.".to_string()))?;

    let booking_dates = dates_in_range(booking.start_date, booking.end_date);
    let current_guide_id = booking.guide_id;

    let txn = state.db.begin().await?;

    if !availability::is_range_free(&txn, substitute.id, &booking_dates).await? {
        return Err(AppError::Conflict(
            "The substitute guide is not available for these dates.".to_string(),
        ));
    }

    availability::release(&txn, current_guide_id, &booking_dates).await?;
    availability::reserve(&txn, substitute.id, Some(booking.id), &booking_dates).await?;

    let original_guide_id = booking.original_guide_id.unwrap_or(current_guide_id);

    let mut active: booking::ActiveModel = booking.into();
    active.guide_id = Set(substitute.id);
    active.original_guide_id = Set(Some(original_guide_id));
    active.status = Set(BookingStatus::Upcoming);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        booking_id = %updated.id,
        from_guide = %current_guide_id,
        to_guide = %substitute.id,
        "substitute guide assigned"
    );

    Ok(Json(updated))
}

/// Delete a booking permanently (admin), releasing its dates first
pub async fn delete_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    require_admin_claims(&claims)?;

    let booking = booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found.".to_string()))?;

    let booking_dates = dates_in_range(booking.start_date, booking.end_date);

    let txn = state.db.begin().await?;
    availability::release(&txn, booking.guide_id, &booking_dates).await?;
    booking::Entity::delete_by_id(booking.id).exec(&txn).await?;
    txn.commit().await?;

    Ok(Json(serde_json::json!({ "message": "Booking deleted successfully." })))
}
