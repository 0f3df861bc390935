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

use crate::models::{CreateOrderRequest, SetFeeRequest, VerifyPaymentRequest};
use crate::services::{EarningsService, FeeService, PaymentService};

#[axum::debug_handler]
pub async fn set_fee_policy(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<SetFeeRequest>,
) -> Result<Json<Value>, AppError> {
    let service = FeeService::new(&state);
    let policy = service.set_fee(&user, request).await?;
    Ok(Json(json!(policy)))
}

#[axum::debug_handler]
pub async fn my_fee_policies(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = FeeService::new(&state);
    let policies = service.my_policies(&user).await?;
    Ok(Json(json!({ "policies": policies })))
}

#[axum::debug_handler]
pub async fn create_payment_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PaymentService::new(&state);
    let order = service.create_order(&user, request).await?;
    Ok(Json(json!(order)))
}

#[axum::debug_handler]
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PaymentService::new(&state);
    let appointment = service.verify_payment(request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn doctor_earnings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = EarningsService::new(&state);
    let earnings = service.doctor_earnings(&user).await?;
    Ok(Json(json!(earnings)))
}

#[axum::debug_handler]
pub async fn clinic_revenue(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(clinic_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = EarningsService::new(&state);
    let revenue = service.clinic_revenue(&user, clinic_id).await?;
    Ok(Json(json!(revenue)))
}
