use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<SchedulingError> for AppError {
    fn from(e: SchedulingError) -> Self {
        match e {
            SchedulingError::Validation(msg) => AppError::ValidationError(msg),
            SchedulingError::Forbidden(msg) => AppError::Forbidden(msg),
            SchedulingError::NotFound(msg) => AppError::NotFound(msg),
            SchedulingError::Conflict(msg) => AppError::Conflict(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWindowRequest {
    pub clinic_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i64,
}

/// One batch of windows across a date range, filtered by weekday names.
#[derive(Debug, Deserialize)]
pub struct RecurrenceRequest {
    pub clinic_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Lowercase weekday names, e.g. ["monday", "thursday"].
    pub days: Vec<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i64,
}

#[derive(Debug, Deserialize)]
pub struct FreeSlotQuery {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct FreeDateQuery {
    pub doctor_id: Uuid,
}
