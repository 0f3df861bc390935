use std::collections::HashSet;

use chrono::{Datelike, Utc, Weekday};
use tracing::info;
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::records::{ApprovalStatus, AvailabilityWindow};
use shared_store::{AppState, ClinicStore, StoreError};

use crate::models::{RecurrenceRequest, SchedulingError};
use crate::services::availability::AvailabilityService;
use crate::services::slots::generate_slots_for_window;

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

pub struct RecurrenceService {
    store: ClinicStore,
    availability: AvailabilityService,
}

impl RecurrenceService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            availability: AvailabilityService::new(state),
        }
    }

    /// Expands a weekday pattern over a date range into one approved window
    /// per matching date, all tagged with a shared recurrence group id, and
    /// generates slots as it goes. Dates whose identical window already
    /// exists are skipped rather than failed.
    pub async fn create_recurring(
        &self,
        user: &AuthUser,
        request: RecurrenceRequest,
    ) -> Result<(usize, usize), SchedulingError> {
        let doctor = self.availability.doctor_for(user).await?;
        AvailabilityService::validate_timing(
            request.start_date,
            request.start_time,
            request.end_time,
            request.slot_duration_minutes,
        )?;
        if request.end_date < request.start_date {
            return Err(SchedulingError::Validation(
                "End date must not be before start date".to_string(),
            ));
        }
        if request.days.is_empty() {
            return Err(SchedulingError::Validation(
                "At least one weekday is required".to_string(),
            ));
        }
        let mut weekdays = HashSet::new();
        for name in &request.days {
            let day = parse_weekday(name).ok_or_else(|| {
                SchedulingError::Validation(format!("Unknown weekday: {}", name))
            })?;
            weekdays.insert(day);
        }
        if !self
            .store
            .is_affiliation_approved(doctor.id, request.clinic_id)
            .await
        {
            return Err(SchedulingError::Forbidden(
                "No approved affiliation with this clinic".to_string(),
            ));
        }

        let group = Uuid::new_v4();
        let mut windows_created = 0;
        let mut slots_created = 0;

        for date in request
            .start_date
            .iter_days()
            .take_while(|d| *d <= request.end_date)
        {
            if !weekdays.contains(&date.weekday()) {
                continue;
            }
            let window = match self
                .store
                .insert_window(AvailabilityWindow {
                    id: Uuid::new_v4(),
                    doctor_id: doctor.id,
                    clinic_id: request.clinic_id,
                    date,
                    start_time: request.start_time,
                    end_time: request.end_time,
                    slot_duration_minutes: request.slot_duration_minutes,
                    status: ApprovalStatus::Approved,
                    recurrence_group: Some(group),
                    created_at: Utc::now(),
                })
                .await
            {
                Ok(window) => window,
                Err(StoreError::Duplicate(_)) => continue,
                Err(other) => return Err(SchedulingError::Conflict(other.to_string())),
            };
            windows_created += 1;
            slots_created += generate_slots_for_window(&self.store, &window).await;
        }

        info!(
            "recurrence group {} for doctor {}: {} windows, {} slots",
            group, doctor.id, windows_created, slots_created
        );
        Ok((windows_created, slots_created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_weekday_names_case_insensitively() {
        assert_eq!(parse_weekday("monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("Sunday"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("THURSDAY"), Some(Weekday::Thu));
        assert_eq!(parse_weekday("someday"), None);
    }
}
