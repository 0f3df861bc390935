use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{BookAppointmentRequest, FollowUpRequest, LeaveRequest, WalkInRequest};
use crate::services::{BookingService, FollowUpService, LeaveService, WalkInService};

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    let appointment = service.book(&user, request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    let appointment = service.cancel(&user, appointment_id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn my_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    let appointments = service.my_appointments(&user).await;
    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn doctor_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    let appointments = service.doctor_appointments(&user).await?;
    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn clinic_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(clinic_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    let appointments = service.clinic_appointments(&user, clinic_id).await?;
    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn declare_leave(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<LeaveRequest>,
) -> Result<Json<Value>, AppError> {
    let service = LeaveService::new(&state);
    let outcome = service.apply_leave(&user, request).await?;
    Ok(Json(json!({
        "cancelled": outcome.cancelled,
        "slots_blocked": outcome.slots_blocked,
    })))
}

#[axum::debug_handler]
pub async fn book_follow_up(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<FollowUpRequest>,
) -> Result<Json<Value>, AppError> {
    let service = FollowUpService::new(&state);
    let appointment = service.book_follow_up(&user, request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn book_walk_in(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<WalkInRequest>,
) -> Result<Json<Value>, AppError> {
    let service = WalkInService::new(&state);
    let appointment = service.book_walk_in(&user, request).await?;
    Ok(Json(json!(appointment)))
}
