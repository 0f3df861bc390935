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

use crate::models::{AffiliationRequest, CreateClinicRequest, RegisterDoctorRequest};
use crate::services::{AffiliationService, RegistryService};

#[axum::debug_handler]
pub async fn create_clinic(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateClinicRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RegistryService::new(&state);
    let clinic = service.create_clinic(&user, request).await?;
    Ok(Json(json!(clinic)))
}

#[axum::debug_handler]
pub async fn my_clinics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = RegistryService::new(&state);
    let clinics = service.my_clinics(&user).await;
    Ok(Json(json!({ "clinics": clinics })))
}

#[axum::debug_handler]
pub async fn get_clinic(
    State(state): State<Arc<AppState>>,
    Path(clinic_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = RegistryService::new(&state);
    let clinic = service.get_clinic(clinic_id).await?;
    Ok(Json(json!(clinic)))
}

#[axum::debug_handler]
pub async fn register_doctor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<RegisterDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RegistryService::new(&state);
    let doctor = service.register_doctor(&user, request).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn verify_doctor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = RegistryService::new(&state);
    let doctor = service.verify_doctor(&user, doctor_id).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn request_affiliation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AffiliationRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AffiliationService::new(&state);
    let affiliation = service.request_affiliation(&user, request.clinic_id).await?;
    Ok(Json(json!(affiliation)))
}

#[axum::debug_handler]
pub async fn approve_affiliation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(affiliation_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AffiliationService::new(&state);
    let affiliation = service.decide_affiliation(&user, affiliation_id, true).await?;
    Ok(Json(json!(affiliation)))
}

#[axum::debug_handler]
pub async fn reject_affiliation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(affiliation_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AffiliationService::new(&state);
    let affiliation = service.decide_affiliation(&user, affiliation_id, false).await?;
    Ok(Json(json!(affiliation)))
}

#[axum::debug_handler]
pub async fn clinic_affiliations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(clinic_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AffiliationService::new(&state);
    let affiliations = service.list_for_clinic(&user, clinic_id).await?;
    Ok(Json(json!({ "affiliations": affiliations })))
}

#[axum::debug_handler]
pub async fn my_affiliations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = AffiliationService::new(&state);
    let affiliations = service.list_mine(&user).await?;
    Ok(Json(json!({ "affiliations": affiliations })))
}
