use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use shared_models::records::{AppointmentStatus, Payment, RevenueRecord};
use shared_store::{AppState, ClinicStore};

use crate::models::BillingError;
use crate::services::fees::resolve_split;

pub struct Reconciler {
    store: ClinicStore,
}

impl Reconciler {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Turns a completed payment into a revenue record. Idempotent: an
    /// appointment that already has a record is left alone (returns false).
    /// Without a fee policy there is nothing to split, so the run is skipped
    /// with a log line rather than failed.
    pub async fn reconcile(&self, payment: &Payment) -> Result<bool, BillingError> {
        let appointment = self
            .store
            .get_appointment(payment.appointment_id)
            .await
            .map_err(|_| BillingError::NotFound("Appointment not found".to_string()))?;

        // A cancelled appointment earns nothing; reconciling it would also
        // re-book its released slot.
        if appointment.status == AppointmentStatus::Cancelled {
            warn!(
                "appointment {} is cancelled, skipping revenue reconciliation",
                appointment.id
            );
            return Ok(false);
        }

        let policy = match self
            .store
            .fee_policy_for(appointment.doctor_id, appointment.clinic_id)
            .await
        {
            Some(policy) => policy,
            None => {
                warn!(
                    "no fee policy for doctor {} at clinic {}, skipping revenue reconciliation",
                    appointment.doctor_id, appointment.clinic_id
                );
                return Ok(false);
            }
        };

        // The split is computed from what was actually collected.
        let total = payment.amount;
        let (clinic_share, doctor_earning) =
            resolve_split(total, policy.clinic_share_percent, policy.clinic_fixed_fee);

        let applied = self
            .store
            .apply_reconciliation(RevenueRecord {
                id: Uuid::new_v4(),
                clinic_id: appointment.clinic_id,
                doctor_id: appointment.doctor_id,
                appointment_id: appointment.id,
                total_fee: total,
                clinic_share,
                doctor_earning,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| BillingError::Conflict(e.to_string()))?;

        if applied {
            info!(
                "revenue reconciled for appointment {}: clinic {} / doctor {}",
                appointment.id, clinic_share, doctor_earning
            );
        } else {
            info!(
                "revenue already reconciled for appointment {}, nothing to do",
                appointment.id
            );
        }
        Ok(applied)
    }
}
