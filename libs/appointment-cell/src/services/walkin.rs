use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use shared_models::auth::{AuthUser, Role};
use shared_models::records::{Appointment, AppointmentStatus, TimeSlot};
use shared_store::{AppState, ClinicStore, StoreError};

use crate::models::{AppointmentError, WalkInRequest};
use crate::services::token_suffix;

/// Walk-in consultations last a fixed 20 minutes.
const WALK_IN_MINUTES: i64 = 20;

pub struct WalkInService {
    store: ClinicStore,
}

impl WalkInService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Front-desk booking for a patient standing at the counter. A guest
    /// identity is created (or reused, keyed by contact) and an ad-hoc slot
    /// is written already booked, bypassing the availability pipeline.
    /// Settlement happens at the desk, so the appointment is confirmed but
    /// unpaid with no amount.
    pub async fn book_walk_in(
        &self,
        user: &AuthUser,
        request: WalkInRequest,
    ) -> Result<Appointment, AppointmentError> {
        if user.role != Role::ClinicOwner {
            return Err(AppointmentError::Forbidden(
                "Only clinic owners can book walk-ins".to_string(),
            ));
        }
        let clinic = self
            .store
            .get_clinic(request.clinic_id)
            .await
            .map_err(|_| AppointmentError::NotFound("Clinic not found".to_string()))?;
        if clinic.owner_id != user.id {
            return Err(AppointmentError::Forbidden(
                "Only the clinic owner can book walk-ins here".to_string(),
            ));
        }
        let doctor = self
            .store
            .get_doctor(request.doctor_id)
            .await
            .map_err(|_| AppointmentError::NotFound("Doctor not found".to_string()))?;
        if !self
            .store
            .is_affiliation_approved(doctor.id, clinic.id)
            .await
        {
            return Err(AppointmentError::InvalidAssociation(
                "Doctor is not affiliated with this clinic".to_string(),
            ));
        }
        if request.patient_name.trim().is_empty() || request.contact.trim().is_empty() {
            return Err(AppointmentError::Validation(
                "Patient name and contact are required".to_string(),
            ));
        }

        let guest_email = format!("offline_{}@guest.com", request.contact.trim());
        let patient = self
            .store
            .find_or_create_patient(&guest_email, request.patient_name.trim())
            .await;

        let start = request.start.unwrap_or_else(Utc::now);
        let mut attempts = 0;
        loop {
            let slot = TimeSlot {
                id: Uuid::new_v4(),
                doctor_id: doctor.id,
                clinic_id: clinic.id,
                start,
                end: start + Duration::minutes(WALK_IN_MINUTES),
                is_booked: true,
                created_at: Utc::now(),
            };
            let appointment = Appointment {
                id: Uuid::new_v4(),
                patient_id: patient.id,
                doctor_id: doctor.id,
                clinic_id: clinic.id,
                slot_id: Some(slot.id),
                status: AppointmentStatus::Confirmed,
                amount: 0.0,
                paid: false,
                token: format!("OFF-{}", token_suffix(8)),
                notes: String::new(),
                created_at: Utc::now(),
            };
            match self.store.insert_walk_in(slot, appointment).await {
                Ok(appointment) => {
                    info!(
                        "walk-in {} booked at clinic {} for guest {}",
                        appointment.token, clinic.id, patient.id
                    );
                    return Ok(appointment);
                }
                Err(StoreError::Duplicate(_)) if attempts == 0 => {
                    attempts += 1;
                }
                Err(StoreError::Duplicate(_)) => {
                    return Err(AppointmentError::Conflict(
                        "Could not allocate a unique booking token".to_string(),
                    ));
                }
                Err(other) => {
                    return Err(AppointmentError::NotFound(other.to_string()));
                }
            }
        }
    }
}
