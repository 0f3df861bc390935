use tracing::info;
use uuid::Uuid;

use shared_models::auth::{AuthUser, Role};
use shared_models::records::{Clinic, Doctor};
use shared_store::{AppState, ClinicStore};

use crate::models::{ClinicError, CreateClinicRequest, RegisterDoctorRequest};

pub struct RegistryService {
    store: ClinicStore,
}

impl RegistryService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn create_clinic(
        &self,
        user: &AuthUser,
        request: CreateClinicRequest,
    ) -> Result<Clinic, ClinicError> {
        if user.role != Role::ClinicOwner {
            return Err(ClinicError::Forbidden(
                "Only clinic owners can create clinics".to_string(),
            ));
        }
        if request.name.trim().is_empty() {
            return Err(ClinicError::Validation("Clinic name is required".to_string()));
        }

        let clinic = self
            .store
            .insert_clinic(Clinic {
                id: Uuid::new_v4(),
                owner_id: user.id,
                name: request.name.trim().to_string(),
                address: request.address.trim().to_string(),
            })
            .await;
        info!("clinic {} created by {}", clinic.id, user.id);
        Ok(clinic)
    }

    pub async fn get_clinic(&self, clinic_id: Uuid) -> Result<Clinic, ClinicError> {
        self.store
            .get_clinic(clinic_id)
            .await
            .map_err(|_| ClinicError::NotFound("Clinic not found".to_string()))
    }

    pub async fn my_clinics(&self, user: &AuthUser) -> Vec<Clinic> {
        self.store.clinics_owned_by(user.id).await
    }

    /// Doctor self-registration. One profile per user account.
    pub async fn register_doctor(
        &self,
        user: &AuthUser,
        request: RegisterDoctorRequest,
    ) -> Result<Doctor, ClinicError> {
        if user.role != Role::Doctor {
            return Err(ClinicError::Forbidden(
                "Only doctors can register a doctor profile".to_string(),
            ));
        }
        if request.fee < 0.0 {
            return Err(ClinicError::Validation(
                "Consultation fee cannot be negative".to_string(),
            ));
        }
        if self.store.doctor_for_user(user.id).await.is_ok() {
            return Err(ClinicError::Conflict(
                "Doctor profile already exists".to_string(),
            ));
        }

        let doctor = self
            .store
            .insert_doctor(Doctor {
                id: Uuid::new_v4(),
                user_id: user.id,
                full_name: user.full_name.clone(),
                fee: request.fee,
                is_verified: false,
            })
            .await;
        Ok(doctor)
    }

    pub async fn verify_doctor(
        &self,
        user: &AuthUser,
        doctor_id: Uuid,
    ) -> Result<Doctor, ClinicError> {
        if !user.is_admin() {
            return Err(ClinicError::Forbidden(
                "Only admins can verify doctors".to_string(),
            ));
        }
        self.store
            .set_doctor_verified(doctor_id)
            .await
            .map_err(|_| ClinicError::NotFound("Doctor not found".to_string()))
    }
}
