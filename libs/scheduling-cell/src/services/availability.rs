use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::info;
use uuid::Uuid;

use shared_models::auth::{AuthUser, Role};
use shared_models::records::{ApprovalStatus, AvailabilityWindow, Doctor, TimeSlot};
use shared_store::{AppState, ClinicStore, StoreError};

use crate::models::{CreateWindowRequest, SchedulingError};
use crate::services::slots::generate_slots_for_window;

pub struct AvailabilityService {
    store: ClinicStore,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub(crate) async fn doctor_for(&self, user: &AuthUser) -> Result<Doctor, SchedulingError> {
        if user.role != Role::Doctor {
            return Err(SchedulingError::Forbidden(
                "Only doctors can manage availability".to_string(),
            ));
        }
        self.store
            .doctor_for_user(user.id)
            .await
            .map_err(|_| SchedulingError::NotFound("Doctor profile not found".to_string()))
    }

    pub(crate) fn validate_timing(
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        slot_duration_minutes: i64,
    ) -> Result<(), SchedulingError> {
        if end_time <= start_time {
            return Err(SchedulingError::Validation(
                "End time must be after start time".to_string(),
            ));
        }
        if slot_duration_minutes <= 0 {
            return Err(SchedulingError::Validation(
                "Slot duration must be positive".to_string(),
            ));
        }
        let now = Utc::now();
        let today = now.date_naive();
        if date < today {
            return Err(SchedulingError::Validation(
                "Availability cannot be created for a past date".to_string(),
            ));
        }
        if date == today && start_time <= now.time() {
            return Err(SchedulingError::Validation(
                "Start time must be in the future for today".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates one approved window for a single day and regenerates that
    /// day's slots. The unbooked remainder of the day is cleared first so
    /// resubmitting a changed window replaces stale intervals; booked slots
    /// stay.
    pub async fn create_window(
        &self,
        user: &AuthUser,
        request: CreateWindowRequest,
    ) -> Result<(AvailabilityWindow, usize), SchedulingError> {
        let doctor = self.doctor_for(user).await?;
        Self::validate_timing(
            request.date,
            request.start_time,
            request.end_time,
            request.slot_duration_minutes,
        )?;
        if !self
            .store
            .is_affiliation_approved(doctor.id, request.clinic_id)
            .await
        {
            return Err(SchedulingError::Forbidden(
                "No approved affiliation with this clinic".to_string(),
            ));
        }

        self.store
            .delete_unbooked_slots_for_day(doctor.id, request.clinic_id, request.date)
            .await;

        let window = self
            .store
            .insert_window(AvailabilityWindow {
                id: Uuid::new_v4(),
                doctor_id: doctor.id,
                clinic_id: request.clinic_id,
                date: request.date,
                start_time: request.start_time,
                end_time: request.end_time,
                slot_duration_minutes: request.slot_duration_minutes,
                status: ApprovalStatus::Approved,
                recurrence_group: None,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => SchedulingError::Conflict(
                    "An identical availability window already exists".to_string(),
                ),
                other => SchedulingError::Conflict(other.to_string()),
            })?;

        let created = generate_slots_for_window(&self.store, &window).await;
        info!(
            "window {} created for doctor {} with {} slots",
            window.id, doctor.id, created
        );
        Ok((window, created))
    }

    /// Clinic-owner decision on a pending window. Approval generates the
    /// slots the window was waiting on.
    pub async fn decide_window(
        &self,
        user: &AuthUser,
        window_id: Uuid,
        approve: bool,
    ) -> Result<(AvailabilityWindow, usize), SchedulingError> {
        let window = self
            .store
            .get_window(window_id)
            .await
            .map_err(|_| SchedulingError::NotFound("Availability window not found".to_string()))?;
        let clinic = self
            .store
            .get_clinic(window.clinic_id)
            .await
            .map_err(|_| SchedulingError::NotFound("Clinic not found".to_string()))?;
        if clinic.owner_id != user.id {
            return Err(SchedulingError::Forbidden(
                "Only the clinic owner can decide availability windows".to_string(),
            ));
        }

        let was_pending = window.status == ApprovalStatus::Pending;
        let status = if approve {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Rejected
        };
        let window = self
            .store
            .set_window_status(window_id, status)
            .await
            .map_err(|_| SchedulingError::NotFound("Availability window not found".to_string()))?;

        let created = if approve && was_pending {
            generate_slots_for_window(&self.store, &window).await
        } else {
            0
        };
        Ok((window, created))
    }

    pub async fn delete_window(&self, user: &AuthUser, window_id: Uuid) -> Result<(), SchedulingError> {
        let doctor = self.doctor_for(user).await?;
        self.store
            .delete_window(doctor.id, window_id)
            .await
            .map_err(|_| SchedulingError::NotFound("Availability window not found".to_string()))
    }

    pub async fn delete_recurrence_group(
        &self,
        user: &AuthUser,
        group: Uuid,
    ) -> Result<usize, SchedulingError> {
        let doctor = self.doctor_for(user).await?;
        let removed = self.store.delete_windows_by_group(doctor.id, group).await;
        if removed == 0 {
            return Err(SchedulingError::NotFound(
                "No availability windows in this recurrence group".to_string(),
            ));
        }
        Ok(removed)
    }

    pub async fn my_windows(&self, user: &AuthUser) -> Result<Vec<AvailabilityWindow>, SchedulingError> {
        let doctor = self.doctor_for(user).await?;
        Ok(self.store.windows_for_doctor(doctor.id).await)
    }

    pub async fn delete_slot(&self, user: &AuthUser, slot_id: Uuid) -> Result<(), SchedulingError> {
        let doctor = self.doctor_for(user).await?;
        self.store.delete_slot(doctor.id, slot_id).await.map_err(|e| match e {
            StoreError::SlotBooked => {
                SchedulingError::Conflict("Booked slots cannot be deleted".to_string())
            }
            _ => SchedulingError::NotFound("Slot not found".to_string()),
        })
    }

    pub async fn free_slots(&self, doctor_id: Uuid, date: NaiveDate) -> Vec<TimeSlot> {
        self.store.free_slots_on(doctor_id, date).await
    }

    pub async fn free_dates(&self, doctor_id: Uuid) -> Vec<NaiveDate> {
        self.store.free_dates_from(doctor_id, Utc::now().date_naive()).await
    }
}
