use tracing::info;

use notification_cell::NotificationService;
use shared_models::auth::{AuthUser, Role};
use shared_models::records::Appointment;
use shared_store::{AppState, ClinicStore};

use crate::models::{AppointmentError, LeaveRequest};

pub struct LeaveService {
    store: ClinicStore,
    notifications: NotificationService,
}

#[derive(Debug)]
pub struct LeaveOutcome {
    pub cancelled: Vec<Appointment>,
    pub slots_blocked: usize,
}

impl LeaveService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            notifications: NotificationService::new(state),
        }
    }

    /// Doctor takes the day off at one clinic. The store cancels every
    /// pending or confirmed appointment on that day's slots and blocks the
    /// slots in a single atomic unit; patient notifications go out
    /// afterwards, fire-and-forget.
    pub async fn apply_leave(
        &self,
        user: &AuthUser,
        request: LeaveRequest,
    ) -> Result<LeaveOutcome, AppointmentError> {
        if user.role != Role::Doctor {
            return Err(AppointmentError::Forbidden(
                "Only doctors can declare leave".to_string(),
            ));
        }
        let doctor = self
            .store
            .doctor_for_user(user.id)
            .await
            .map_err(|_| AppointmentError::NotFound("Doctor profile not found".to_string()))?;
        if !self
            .store
            .is_affiliation_approved(doctor.id, request.clinic_id)
            .await
        {
            return Err(AppointmentError::Forbidden(
                "No approved affiliation with this clinic".to_string(),
            ));
        }

        let (cancelled, slots_blocked) = self
            .store
            .leave_cascade(
                doctor.id,
                request.clinic_id,
                request.date,
                "Cancelled due to doctor's leave.",
            )
            .await;

        for appointment in &cancelled {
            self.notifications
                .notify(
                    appointment.patient_id,
                    "Appointment cancelled",
                    &format!(
                        "Your appointment {} on {} was cancelled due to doctor's leave.",
                        appointment.token, request.date
                    ),
                )
                .await;
        }

        info!(
            "leave applied for doctor {} on {}: {} appointments cancelled, {} slots blocked",
            doctor.id,
            request.date,
            cancelled.len(),
            slots_blocked
        );
        Ok(LeaveOutcome {
            cancelled,
            slots_blocked,
        })
    }
}
