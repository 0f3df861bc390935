use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::records::{Appointment, AppointmentStatus, Payment, PaymentStatus};
use shared_store::{AppState, ClinicStore, StoreError};

use crate::models::{BillingError, CreateOrderRequest, VerifyPaymentRequest};
use crate::provider::{GatewayProvider, PaymentProvider};
use crate::services::Reconciler;

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order_reference: String,
    pub amount: f64,
    pub currency: String,
    pub key_id: String,
}

pub struct PaymentService {
    store: ClinicStore,
    config: AppConfig,
    provider: GatewayProvider,
    reconciler: Reconciler,
}

impl PaymentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            config: state.config.clone(),
            provider: GatewayProvider::new(&state.config),
            reconciler: Reconciler::new(state),
        }
    }

    /// Opens a payment order for an appointment identified by its booking
    /// token. One pending Payment row is stored per order.
    pub async fn create_order(
        &self,
        user: &AuthUser,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, BillingError> {
        let appointment = self
            .store
            .get_appointment_by_token(&request.token)
            .await
            .map_err(|_| BillingError::NotFound("Appointment not found".to_string()))?;
        if appointment.patient_id != user.id {
            return Err(BillingError::Forbidden(
                "Only the booking patient can pay for this appointment".to_string(),
            ));
        }
        if appointment.status == AppointmentStatus::Cancelled {
            return Err(BillingError::Validation(
                "Cancelled appointments cannot be paid for".to_string(),
            ));
        }
        if appointment.paid {
            return Err(BillingError::Conflict(
                "Appointment is already paid".to_string(),
            ));
        }
        if appointment.amount <= 0.0 {
            return Err(BillingError::Validation(
                "Appointment has no amount due".to_string(),
            ));
        }

        let amount_minor = (appointment.amount * 100.0).round() as i64;
        let order_reference = self
            .provider
            .create_order(amount_minor, &self.config.payment_currency)
            .await?;

        self.store
            .insert_payment(Payment {
                id: Uuid::new_v4(),
                appointment_id: appointment.id,
                order_reference: order_reference.clone(),
                amount: appointment.amount,
                status: PaymentStatus::Pending,
                method: "online".to_string(),
                transaction_reference: None,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => {
                    BillingError::Conflict("Order reference already exists".to_string())
                }
                other => BillingError::Conflict(other.to_string()),
            })?;

        info!(
            "payment order {} opened for appointment {}",
            order_reference, appointment.id
        );
        Ok(OrderResponse {
            order_reference,
            amount: appointment.amount,
            currency: self.config.payment_currency.clone(),
            key_id: self.config.payment_key_id.clone(),
        })
    }

    /// Gateway callback: checks the signature, completes the payment,
    /// confirms the appointment, then reconciles revenue. A bad signature
    /// blocks confirmation outright; a reconciliation problem is logged and
    /// never undoes the completed payment.
    pub async fn verify_payment(
        &self,
        request: VerifyPaymentRequest,
    ) -> Result<Appointment, BillingError> {
        let payment = self
            .store
            .payment_by_order(&request.order_reference)
            .await
            .map_err(|_| BillingError::NotFound("Payment not found".to_string()))?;

        if !self.provider.verify_signature(
            &request.order_reference,
            &request.payment_reference,
            &request.signature,
        ) {
            warn!(
                "signature verification failed for order {}",
                request.order_reference
            );
            return Err(BillingError::Validation(
                "Payment signature verification failed".to_string(),
            ));
        }

        let payment = self
            .store
            .complete_payment(&request.order_reference, &request.payment_reference)
            .await
            .map_err(|_| BillingError::NotFound("Payment not found".to_string()))?;
        let appointment = self
            .store
            .mark_appointment_paid(payment.appointment_id)
            .await
            .map_err(|_| BillingError::NotFound("Appointment not found".to_string()))?;

        // Cancellation is terminal. The payment stays completed for the
        // refund trail, but the appointment is not confirmed and no revenue
        // is recorded.
        if appointment.status == AppointmentStatus::Cancelled {
            warn!(
                "payment {} completed for cancelled appointment {}, skipping confirmation",
                payment.order_reference, appointment.id
            );
            return Ok(appointment);
        }

        if let Err(e) = self.reconciler.reconcile(&payment).await {
            warn!(
                "revenue reconciliation failed for appointment {}: {}",
                appointment.id, e
            );
        }

        info!(
            "payment {} verified for appointment {}",
            payment.order_reference, appointment.id
        );
        Ok(appointment)
    }
}
