use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::tour;
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTourRequest {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub locations: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTourRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub locations: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

/// List all tour packages (public)
pub async fn list_tours(State(state): State<AppState>) -> AppResult<Json<Vec<tour::Model>>> {
    let tours = tour::Entity::find()
        .order_by_desc(tour::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(tours))
}

/// Get a single tour package (public)
pub async fn get_tour(
    State(state): State<AppState>,
    Path(tour_id): Path<Uuid>,
) -> AppResult<Json<tour::Model>> {
    let tour = tour::Entity::find_by_id(tour_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tour not found.".to_string()))?;

    Ok(Json(tour))
}

/// Create a tour package (admin)
pub async fn create_tour(
    State(state): State<AppState>,
    Json(payload): Json<CreateTourRequest>,
) -> AppResult<(StatusCode, Json<tour::Model>)> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required.".to_string()));
    }

    if payload.price <= 0.0 {
        return Err(AppError::BadRequest("Price must be positive.".to_string()));
    }

    let saved = tour::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title),
        description: Set(payload.description),
        price: Set(payload.price),
        locations: Set(serde_json::json!(payload.locations.unwrap_or_default())),
        images: Set(serde_json::json!(payload.images.unwrap_or_default())),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Update a tour package (admin)
pub async fn update_tour(
    State(state): State<AppState>,
    Path(tour_id): Path<Uuid>,
    Json(payload): Json<UpdateTourRequest>,
) -> AppResult<Json<tour::Model>> {
    let tour = tour::Entity::find_by_id(tour_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tour not found.".to_string()))?;

    let mut active: tour::ActiveModel = tour.into();

    if let Some(title) = payload.title {
        if title.trim().is_empty() {
            return Err(AppError::BadRequest("Title is required.".to_string()));
        }
        active.title = Set(title);
    }

    if let Some(price) = payload.price {
        if price <= 0.0 {
            return Err(AppError::BadRequest("Price must be positive.".to_string()));
        }
        active.price = Set(price);
    }

    if payload.description.is_some() {
        active.description = Set(payload.description);
    }

    if let Some(locations) = payload.locations {
        active.locations = Set(serde_json::json!(locations));
    }

    if let Some(images) = payload.images {
        active.images = Set(serde_json::json!(images));
    }

    let updated = active.update(&state.db).await?;
    Ok(Json(updated))
}

/// Delete a tour package (admin)
pub async fn delete_tour(
    State(state): State<AppState>,
    Path(tour_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = tour::Entity::delete_by_id(tour_id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Tour not found.".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Tour deleted" })))
}
