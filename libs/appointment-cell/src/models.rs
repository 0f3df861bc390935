use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    /// The slot exists but does not belong to the doctor or clinic named in
    /// the request.
    #[error("Invalid association: {0}")]
    InvalidAssociation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::Validation(msg) => AppError::ValidationError(msg),
            AppointmentError::Forbidden(msg) => AppError::Forbidden(msg),
            AppointmentError::NotFound(msg) => AppError::NotFound(msg),
            AppointmentError::SlotUnavailable(msg) => AppError::SlotUnavailable(msg),
            AppointmentError::InvalidAssociation(msg) => AppError::ValidationError(msg),
            AppointmentError::Conflict(msg) => AppError::Conflict(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub slot_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeaveRequest {
    pub clinic_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct FollowUpRequest {
    pub patient_id: Uuid,
    pub clinic_id: Uuid,
    pub slot_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WalkInRequest {
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub patient_name: String,
    /// Contact handle (phone or similar) used to key the guest identity.
    pub contact: String,
    /// Defaults to now; walk-ins are seen immediately.
    pub start: Option<DateTime<Utc>>,
}
