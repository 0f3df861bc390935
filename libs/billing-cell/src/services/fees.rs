use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use shared_models::auth::{AuthUser, Role};
use shared_models::records::FeePolicy;
use shared_store::{AppState, ClinicStore};

use crate::models::{BillingError, SetFeeRequest};

/// Splits a collected fee between clinic and doctor. A configured fixed fee
/// wins over the percentage; either way the clinic share never exceeds the
/// total.
pub fn resolve_split(total: f64, share_percent: f64, fixed_fee: Option<f64>) -> (f64, f64) {
    let clinic_share = match fixed_fee {
        Some(fixed) => fixed.min(total),
        None => total * share_percent / 100.0,
    };
    let clinic_share = clinic_share.clamp(0.0, total);
    (clinic_share, total - clinic_share)
}

pub struct FeeService {
    store: ClinicStore,
}

impl FeeService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Creates or updates the doctor's fee policy at one clinic and keeps
    /// the doctor's default fee in step with it.
    pub async fn set_fee(
        &self,
        user: &AuthUser,
        request: SetFeeRequest,
    ) -> Result<FeePolicy, BillingError> {
        if user.role != Role::Doctor {
            return Err(BillingError::Forbidden(
                "Only doctors can set fee policies".to_string(),
            ));
        }
        let doctor = self
            .store
            .doctor_for_user(user.id)
            .await
            .map_err(|_| BillingError::NotFound("Doctor profile not found".to_string()))?;
        if !self
            .store
            .is_affiliation_approved(doctor.id, request.clinic_id)
            .await
        {
            return Err(BillingError::Forbidden(
                "No approved affiliation with this clinic".to_string(),
            ));
        }
        if request.consultation_fee < 0.0 {
            return Err(BillingError::Validation(
                "Consultation fee cannot be negative".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&request.clinic_share_percent) {
            return Err(BillingError::Validation(
                "Clinic share percent must be between 0 and 100".to_string(),
            ));
        }
        if let Some(fixed) = request.clinic_fixed_fee {
            if fixed < 0.0 {
                return Err(BillingError::Validation(
                    "Clinic fixed fee cannot be negative".to_string(),
                ));
            }
        }

        let policy = self
            .store
            .upsert_fee_policy(FeePolicy {
                id: Uuid::new_v4(),
                doctor_id: doctor.id,
                clinic_id: request.clinic_id,
                consultation_fee: request.consultation_fee,
                clinic_share_percent: request.clinic_share_percent,
                clinic_fixed_fee: request.clinic_fixed_fee,
                updated_at: Utc::now(),
            })
            .await;

        self.store
            .set_doctor_fee(doctor.id, request.consultation_fee)
            .await
            .map_err(|_| BillingError::NotFound("Doctor profile not found".to_string()))?;

        info!(
            "fee policy set for doctor {} at clinic {}: fee {}",
            doctor.id, request.clinic_id, request.consultation_fee
        );
        Ok(policy)
    }

    pub async fn my_policies(&self, user: &AuthUser) -> Result<Vec<FeePolicy>, BillingError> {
        let doctor = self
            .store
            .doctor_for_user(user.id)
            .await
            .map_err(|_| BillingError::NotFound("Doctor profile not found".to_string()))?;
        Ok(self.store.fee_policies_for_doctor(doctor.id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_fee_takes_precedence() {
        let (clinic, doctor) = resolve_split(1000.0, 20.0, Some(300.0));
        assert_eq!(clinic, 300.0);
        assert_eq!(doctor, 700.0);
    }

    #[test]
    fn percentage_split_without_fixed_fee() {
        let (clinic, doctor) = resolve_split(1000.0, 20.0, None);
        assert_eq!(clinic, 200.0);
        assert_eq!(doctor, 800.0);
    }

    #[test]
    fn fixed_fee_is_clamped_to_the_total() {
        let (clinic, doctor) = resolve_split(1000.0, 20.0, Some(1500.0));
        assert_eq!(clinic, 1000.0);
        assert_eq!(doctor, 0.0);
    }
}
