use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{CreateWindowRequest, FreeDateQuery, FreeSlotQuery, RecurrenceRequest};
use crate::services::{AvailabilityService, RecurrenceService};

#[axum::debug_handler]
pub async fn create_window(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateWindowRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);
    let (window, slots_created) = service.create_window(&user, request).await?;
    Ok(Json(json!({
        "window": window,
        "slots_created": slots_created,
    })))
}

#[axum::debug_handler]
pub async fn create_recurring_windows(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<RecurrenceRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RecurrenceService::new(&state);
    let (windows_created, slots_created) = service.create_recurring(&user, request).await?;
    Ok(Json(json!({
        "windows_created": windows_created,
        "slots_created": slots_created,
    })))
}

#[axum::debug_handler]
pub async fn my_windows(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);
    let windows = service.my_windows(&user).await?;
    Ok(Json(json!({ "windows": windows })))
}

#[axum::debug_handler]
pub async fn approve_window(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(window_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);
    let (window, slots_created) = service.decide_window(&user, window_id, true).await?;
    Ok(Json(json!({
        "window": window,
        "slots_created": slots_created,
    })))
}

#[axum::debug_handler]
pub async fn reject_window(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(window_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);
    let (window, _) = service.decide_window(&user, window_id, false).await?;
    Ok(Json(json!({ "window": window })))
}

#[axum::debug_handler]
pub async fn delete_window(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(window_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);
    service.delete_window(&user, window_id).await?;
    Ok(Json(json!({ "deleted": true })))
}

#[axum::debug_handler]
pub async fn delete_recurrence_group(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);
    let removed = service.delete_recurrence_group(&user, group_id).await?;
    Ok(Json(json!({ "deleted": removed })))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(slot_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);
    service.delete_slot(&user, slot_id).await?;
    Ok(Json(json!({ "deleted": true })))
}

#[axum::debug_handler]
pub async fn free_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FreeSlotQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);
    let slots = service.free_slots(query.doctor_id, query.date).await;
    Ok(Json(json!({ "slots": slots })))
}

#[axum::debug_handler]
pub async fn free_dates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FreeDateQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&state);
    let dates = service.free_dates(query.doctor_id).await;
    Ok(Json(json!({ "dates": dates })))
}
