use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payment provider error: {0}")]
    Provider(String),
}

impl From<BillingError> for AppError {
    fn from(e: BillingError) -> Self {
        match e {
            BillingError::Validation(msg) => AppError::ValidationError(msg),
            BillingError::Forbidden(msg) => AppError::Forbidden(msg),
            BillingError::NotFound(msg) => AppError::NotFound(msg),
            BillingError::Conflict(msg) => AppError::Conflict(msg),
            BillingError::Provider(msg) => AppError::ExternalService(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetFeeRequest {
    pub clinic_id: Uuid,
    pub consultation_fee: f64,
    /// Percentage of the fee the clinic keeps when no fixed fee is set.
    pub clinic_share_percent: f64,
    /// When set, the clinic takes this flat amount (capped at the total).
    pub clinic_fixed_fee: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Booking token of the appointment being paid for.
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_reference: String,
    pub payment_reference: String,
    pub signature: String,
}
