use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use notification_cell::NotificationService;
use shared_models::auth::{AuthUser, Role};
use shared_models::records::{Appointment, AppointmentStatus};
use shared_store::{AppState, ClinicStore, StoreError};

use crate::models::{AppointmentError, FollowUpRequest};
use crate::services::token_suffix;

pub struct FollowUpService {
    store: ClinicStore,
    notifications: NotificationService,
}

impl FollowUpService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            notifications: NotificationService::new(state),
        }
    }

    /// Doctor books a free follow-up visit for a known patient. The slot
    /// must belong to the calling doctor at the named clinic.
    pub async fn book_follow_up(
        &self,
        user: &AuthUser,
        request: FollowUpRequest,
    ) -> Result<Appointment, AppointmentError> {
        if user.role != Role::Doctor {
            return Err(AppointmentError::Forbidden(
                "Only doctors can book follow-ups".to_string(),
            ));
        }
        let doctor = self
            .store
            .doctor_for_user(user.id)
            .await
            .map_err(|_| AppointmentError::NotFound("Doctor profile not found".to_string()))?;

        let slot = self
            .store
            .get_slot(request.slot_id)
            .await
            .map_err(|_| AppointmentError::NotFound("Slot not found".to_string()))?;
        if slot.doctor_id != doctor.id {
            return Err(AppointmentError::InvalidAssociation(
                "Slot belongs to a different doctor".to_string(),
            ));
        }
        if slot.clinic_id != request.clinic_id {
            return Err(AppointmentError::InvalidAssociation(
                "Slot does not belong to this clinic".to_string(),
            ));
        }

        let known_patient = self.store.get_patient(request.patient_id).await.is_ok()
            || self
                .store
                .appointments_for_doctor(doctor.id)
                .await
                .iter()
                .any(|a| a.patient_id == request.patient_id);
        if !known_patient {
            return Err(AppointmentError::NotFound("Patient not found".to_string()));
        }

        let mut attempts = 0;
        loop {
            // Follow-ups are free and confirmed on creation.
            let appointment = Appointment {
                id: Uuid::new_v4(),
                patient_id: request.patient_id,
                doctor_id: doctor.id,
                clinic_id: request.clinic_id,
                slot_id: Some(slot.id),
                status: AppointmentStatus::Confirmed,
                amount: 0.0,
                paid: true,
                token: format!("FUP-{}", token_suffix(8)),
                notes: request.notes.clone().unwrap_or_default(),
                created_at: Utc::now(),
            };
            match self.store.book_slot(slot.id, appointment).await {
                Ok(appointment) => {
                    info!(
                        "follow-up {} booked by doctor {} for patient {}",
                        appointment.token, doctor.id, request.patient_id
                    );
                    self.notifications
                        .notify(
                            appointment.patient_id,
                            "Follow-up appointment booked",
                            &format!(
                                "A follow-up visit {} has been scheduled for you on {}.",
                                appointment.token,
                                slot.start.format("%Y-%m-%d %H:%M")
                            ),
                        )
                        .await;
                    return Ok(appointment);
                }
                Err(StoreError::SlotTaken) => {
                    return Err(AppointmentError::SlotUnavailable(
                        "Slot is already booked".to_string(),
                    ));
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
