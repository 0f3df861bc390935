use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use shared_models::auth::{AuthUser, Role};
use shared_models::records::{Appointment, AppointmentStatus};
use shared_store::{AppState, ClinicStore, StoreError};

use crate::models::{AppointmentError, BookAppointmentRequest};

/// Random uppercase-hex disambiguator appended to booking tokens.
pub(crate) fn token_suffix(len: usize) -> String {
    const HEX: &[u8] = b"0123456789ABCDEF";
    let mut rng = rand::thread_rng();
    (0..len).map(|_| HEX[rng.gen_range(0..HEX.len())] as char).collect()
}

pub struct BookingService {
    store: ClinicStore,
}

impl BookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Books a free slot for the calling patient. The reservation itself is
    /// a compare-and-set in the slot ledger, so of two concurrent requests
    /// for the same slot exactly one succeeds and the other sees
    /// `SlotUnavailable`. A token collision is retried once with a fresh
    /// suffix before giving up.
    pub async fn book(
        &self,
        user: &AuthUser,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        if user.role != Role::Patient {
            return Err(AppointmentError::Forbidden(
                "Only patients can book appointments".to_string(),
            ));
        }

        let slot = self
            .store
            .get_slot(request.slot_id)
            .await
            .map_err(|_| AppointmentError::NotFound("Slot not found".to_string()))?;
        if slot.doctor_id != request.doctor_id {
            return Err(AppointmentError::InvalidAssociation(
                "Slot does not belong to this doctor".to_string(),
            ));
        }
        if slot.clinic_id != request.clinic_id {
            return Err(AppointmentError::InvalidAssociation(
                "Slot does not belong to this clinic".to_string(),
            ));
        }

        let doctor = self
            .store
            .get_doctor(request.doctor_id)
            .await
            .map_err(|_| AppointmentError::NotFound("Doctor not found".to_string()))?;
        let amount = match self
            .store
            .fee_policy_for(doctor.id, request.clinic_id)
            .await
        {
            Some(policy) => policy.consultation_fee,
            None => doctor.fee,
        };

        let seq = self
            .store
            .next_token_sequence(doctor.id, slot.start.date_naive())
            .await;

        let mut attempts = 0;
        loop {
            let appointment = Appointment {
                id: Uuid::new_v4(),
                patient_id: user.id,
                doctor_id: doctor.id,
                clinic_id: request.clinic_id,
                slot_id: Some(slot.id),
                status: AppointmentStatus::Pending,
                amount,
                paid: false,
                token: format!("T{}-{}", seq, token_suffix(4)),
                notes: request.notes.clone().unwrap_or_default(),
                created_at: Utc::now(),
            };
            match self.store.book_slot(slot.id, appointment).await {
                Ok(appointment) => {
                    info!(
                        "appointment {} booked by patient {} with token {}",
                        appointment.id, user.id, appointment.token
                    );
                    return Ok(appointment);
                }
                Err(StoreError::SlotTaken) => {
                    return Err(AppointmentError::SlotUnavailable(
                        "Slot was just booked by someone else".to_string(),
                    ));
                }
                Err(StoreError::Duplicate(_)) if attempts == 0 => {
                    // One retry with a new suffix covers the rare collision.
                    warn!("booking token collision for doctor {}, retrying", doctor.id);
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

    /// Patient-initiated cancellation. Only the booking patient may cancel;
    /// cancelling an already-cancelled appointment is a no-op.
    pub async fn cancel(
        &self,
        user: &AuthUser,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .store
            .get_appointment(appointment_id)
            .await
            .map_err(|_| AppointmentError::NotFound("Appointment not found".to_string()))?;
        if appointment.patient_id != user.id {
            return Err(AppointmentError::Forbidden(
                "Only the booking patient can cancel this appointment".to_string(),
            ));
        }
        if appointment.status == AppointmentStatus::Cancelled {
            return Ok(appointment);
        }

        let cancelled = self
            .store
            .cancel_appointment(appointment_id, Some("Cancelled by patient."))
            .await
            .map_err(|_| AppointmentError::NotFound("Appointment not found".to_string()))?;
        info!("appointment {} cancelled by patient {}", appointment_id, user.id);
        Ok(cancelled)
    }

    pub async fn my_appointments(&self, user: &AuthUser) -> Vec<Appointment> {
        self.store.appointments_for_patient(user.id).await
    }

    pub async fn doctor_appointments(
        &self,
        user: &AuthUser,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let doctor = self
            .store
            .doctor_for_user(user.id)
            .await
            .map_err(|_| AppointmentError::NotFound("Doctor profile not found".to_string()))?;
        Ok(self.store.appointments_for_doctor(doctor.id).await)
    }

    pub async fn clinic_appointments(
        &self,
        user: &AuthUser,
        clinic_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let clinic = self
            .store
            .get_clinic(clinic_id)
            .await
            .map_err(|_| AppointmentError::NotFound("Clinic not found".to_string()))?;
        if clinic.owner_id != user.id {
            return Err(AppointmentError::Forbidden(
                "Only the clinic owner can list clinic appointments".to_string(),
            ));
        }
        Ok(self.store.appointments_for_clinic(clinic_id).await)
    }
}
