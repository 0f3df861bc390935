use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<ClinicError> for AppError {
    fn from(e: ClinicError) -> Self {
        match e {
            ClinicError::Validation(msg) => AppError::ValidationError(msg),
            ClinicError::Forbidden(msg) => AppError::Forbidden(msg),
            ClinicError::NotFound(msg) => AppError::NotFound(msg),
            ClinicError::Conflict(msg) => AppError::Conflict(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateClinicRequest {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterDoctorRequest {
    /// Default consultation fee; refined later by per-clinic fee policies.
    pub fee: f64,
}

#[derive(Debug, Deserialize)]
pub struct AffiliationRequest {
    pub clinic_id: Uuid,
}
