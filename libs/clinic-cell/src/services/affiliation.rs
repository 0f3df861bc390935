use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use notification_cell::NotificationService;
use shared_models::auth::{AuthUser, Role};
use shared_models::records::{Affiliation, ApprovalStatus};
use shared_store::{AppState, ClinicStore, StoreError};

use crate::models::ClinicError;

pub struct AffiliationService {
    store: ClinicStore,
    notifications: NotificationService,
}

impl AffiliationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            notifications: NotificationService::new(state),
        }
    }

    /// Doctor asks to practice at a clinic. One request per (doctor, clinic).
    pub async fn request_affiliation(
        &self,
        user: &AuthUser,
        clinic_id: Uuid,
    ) -> Result<Affiliation, ClinicError> {
        if user.role != Role::Doctor {
            return Err(ClinicError::Forbidden(
                "Only doctors can request affiliations".to_string(),
            ));
        }
        let doctor = self
            .store
            .doctor_for_user(user.id)
            .await
            .map_err(|_| ClinicError::NotFound("Doctor profile not found".to_string()))?;
        self.store
            .get_clinic(clinic_id)
            .await
            .map_err(|_| ClinicError::NotFound("Clinic not found".to_string()))?;

        let affiliation = self
            .store
            .insert_affiliation(Affiliation {
                id: Uuid::new_v4(),
                doctor_id: doctor.id,
                clinic_id,
                status: ApprovalStatus::Pending,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => ClinicError::Conflict(
                    "An affiliation with this clinic already exists".to_string(),
                ),
                other => ClinicError::Conflict(other.to_string()),
            })?;
        Ok(affiliation)
    }

    /// Clinic owner approves or rejects a request for their own clinic.
    /// The doctor is notified either way.
    pub async fn decide_affiliation(
        &self,
        user: &AuthUser,
        affiliation_id: Uuid,
        approve: bool,
    ) -> Result<Affiliation, ClinicError> {
        let affiliation = self
            .store
            .get_affiliation(affiliation_id)
            .await
            .map_err(|_| ClinicError::NotFound("Affiliation not found".to_string()))?;
        let clinic = self
            .store
            .get_clinic(affiliation.clinic_id)
            .await
            .map_err(|_| ClinicError::NotFound("Clinic not found".to_string()))?;
        if clinic.owner_id != user.id {
            return Err(ClinicError::Forbidden(
                "Only the clinic owner can decide affiliation requests".to_string(),
            ));
        }

        let status = if approve {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Rejected
        };
        let affiliation = self
            .store
            .set_affiliation_status(affiliation_id, status)
            .await
            .map_err(|_| ClinicError::NotFound("Affiliation not found".to_string()))?;
        info!("affiliation {} {} by {}", affiliation.id, status, user.id);

        if let Ok(doctor) = self.store.get_doctor(affiliation.doctor_id).await {
            let title = if approve {
                "Affiliation approved"
            } else {
                "Affiliation rejected"
            };
            let message = format!(
                "Your affiliation request to {} was {}.",
                clinic.name, status
            );
            self.notifications.notify(doctor.user_id, title, &message).await;
        }

        Ok(affiliation)
    }

    pub async fn list_for_clinic(
        &self,
        user: &AuthUser,
        clinic_id: Uuid,
    ) -> Result<Vec<Affiliation>, ClinicError> {
        let clinic = self
            .store
            .get_clinic(clinic_id)
            .await
            .map_err(|_| ClinicError::NotFound("Clinic not found".to_string()))?;
        if clinic.owner_id != user.id {
            return Err(ClinicError::Forbidden(
                "Only the clinic owner can list affiliation requests".to_string(),
            ));
        }
        Ok(self.store.affiliations_for_clinic(clinic_id).await)
    }

    pub async fn list_mine(&self, user: &AuthUser) -> Result<Vec<Affiliation>, ClinicError> {
        let doctor = self
            .store
            .doctor_for_user(user.id)
            .await
            .map_err(|_| ClinicError::NotFound("Doctor profile not found".to_string()))?;
        Ok(self.store.affiliations_for_doctor(doctor.id).await)
    }
}
