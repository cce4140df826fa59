use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::availability;
use crate::entities::guide;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    pub name: String,
    pub photo: Option<String>,
    pub experience_years: Option<i32>,
    pub description: Option<String>,
    pub languages: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveGuideRequest {
    pub is_approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub unavailable_dates: Vec<NaiveDate>,
}

/// List approved guides (public catalog)
pub async fn list_guides(State(state): State<AppState>) -> AppResult<Json<Vec<guide::Model>>> {
    let guides = guide::Entity::find()
        .filter(guide::Column::IsApproved.eq(true))
        .all(&state.db)
        .await?;

    Ok(Json(guides))
}

/// Get the logged-in guide's profile
pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<guide::Model>> {
    let profile = guide::Entity::find()
        .filter(guide::Column::UserId.eq(claims.sub))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Guide profile not found.".to_string()))?;

    Ok(Json(profile))
}

fn is_complete(name: &str, photo: &Option<String>, experience: Option<i32>, languages: &[String]) -> bool {
    !name.trim().is_empty() && photo.is_some() && experience.is_some() && !languages.is_empty()
}

/// Create or update the logged-in guide's profile. Approval is never set
/// here; a fresh profile starts unapproved.
pub async fn upsert_my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpsertProfileRequest>,
) -> AppResult<Json<guide::Model>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required.".to_string()));
    }

    let languages = payload.languages.unwrap_or_default();
    let complete = is_complete(
        &payload.name,
        &payload.photo,
        payload.experience_years,
        &languages,
    );
    let languages_json = serde_json::json!(languages);

    let existing = guide::Entity::find()
        .filter(guide::Column::UserId.eq(claims.sub))
        .one(&state.db)
        .await?;

    let saved = match existing {
        Some(profile) => {
            let mut active: guide::ActiveModel = profile.into();
            active.name = Set(payload.name);
            active.photo = Set(payload.photo);
            active.experience_years = Set(payload.experience_years);
            active.description = Set(payload.description);
            active.languages = Set(languages_json);
            active.profile_complete = Set(complete);
            active.update(&state.db).await?
        }
        None => {
            guide::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(claims.sub),
                name: Set(payload.name),
                photo: Set(payload.photo),
                experience_years: Set(payload.experience_years),
                description: Set(payload.description),
                languages: Set(languages_json),
                is_approved: Set(false),
                profile_complete: Set(complete),
                ..Default::default()
            }
            .insert(&state.db)
            .await?
        }
    };

    Ok(Json(saved))
}

/// Approve or reject a guide profile (admin)
pub async fn approve_guide(
    State(state): State<AppState>,
    Path(guide_id): Path<Uuid>,
    Json(payload): Json<ApproveGuideRequest>,
) -> AppResult<Json<guide::Model>> {
    let profile = guide::Entity::find_by_id(guide_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Guide profile not found.".to_string()))?;

    if payload.is_approved && !profile.profile_complete {
        return Err(AppError::BadRequest(
            "Cannot approve a guide with an incomplete profile.".to_string(),
        ));
    }

    let mut active: guide::ActiveModel = profile.into();
    active.is_approved = Set(payload.is_approved);
    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

/// Replace the logged-in guide's personal unavailable dates. Dates held by
/// bookings are untouched; colliding with one is a conflict, not an
/// overwrite.
pub async fn update_availability(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> AppResult<Json<Vec<NaiveDate>>> {
    let profile = guide::Entity::find()
        .filter(guide::Column::UserId.eq(claims.sub))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Guide profile not found.".to_string()))?;

    let mut dates = payload.unavailable_dates;
    dates.sort();
    dates.dedup();

    let txn = state.db.begin().await?;
    availability::replace_personal_blocks(&txn, profile.id, &dates).await?;
    txn.commit().await?;

    let all_reserved = availability::reserved_dates(&state.db, profile.id).await?;
    Ok(Json(all_reserved))
}
