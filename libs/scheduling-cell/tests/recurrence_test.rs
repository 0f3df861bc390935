use assert_matches::assert_matches;
use chrono::{Datelike, Duration, NaiveTime, Utc, Weekday};

use scheduling_cell::models::{RecurrenceRequest, SchedulingError};
use scheduling_cell::services::RecurrenceService;
use shared_config::AppConfig;
use shared_store::AppState;
use shared_utils::test_utils::seed_clinic;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn test_state() -> AppState {
    AppState::new(AppConfig::default())
}

#[tokio::test]
async fn expands_weekday_pattern_over_the_range() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let service = RecurrenceService::new(&state);

    let start = Utc::now().date_naive() + Duration::days(1);
    let end = start + Duration::days(13);
    let expected_days = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| matches!(d.weekday(), Weekday::Mon | Weekday::Thu))
        .count();

    let (windows_created, slots_created) = service
        .create_recurring(
            &seeded.doctor_user,
            RecurrenceRequest {
                clinic_id: seeded.clinic.id,
                start_date: start,
                end_date: end,
                days: vec!["monday".to_string(), "thursday".to_string()],
                start_time: time(9, 0),
                end_time: time(11, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap();

    assert_eq!(windows_created, expected_days);
    assert_eq!(slots_created, expected_days * 4);

    let windows = state.store.windows_for_doctor(seeded.doctor.id).await;
    assert_eq!(windows.len(), expected_days);
    let group = windows[0].recurrence_group;
    assert!(group.is_some());
    assert!(windows.iter().all(|w| w.recurrence_group == group));
}

#[tokio::test]
async fn rerun_skips_existing_windows() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let service = RecurrenceService::new(&state);

    let start = Utc::now().date_naive() + Duration::days(1);
    let request = || RecurrenceRequest {
        clinic_id: seeded.clinic.id,
        start_date: start,
        end_date: start + Duration::days(6),
        days: vec!["monday".to_string(), "friday".to_string()],
        start_time: time(10, 0),
        end_time: time(12, 0),
        slot_duration_minutes: 20,
    };

    let (first_windows, first_slots) = service
        .create_recurring(&seeded.doctor_user, request())
        .await
        .unwrap();
    assert!(first_windows > 0);
    assert!(first_slots > 0);

    let (second_windows, second_slots) = service
        .create_recurring(&seeded.doctor_user, request())
        .await
        .unwrap();
    assert_eq!(second_windows, 0);
    assert_eq!(second_slots, 0);
}

#[tokio::test]
async fn rejects_bad_patterns() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let service = RecurrenceService::new(&state);
    let start = Utc::now().date_naive() + Duration::days(1);

    let err = service
        .create_recurring(
            &seeded.doctor_user,
            RecurrenceRequest {
                clinic_id: seeded.clinic.id,
                start_date: start,
                end_date: start + Duration::days(7),
                days: vec![],
                start_time: time(9, 0),
                end_time: time(11, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, SchedulingError::Validation(_));

    let err = service
        .create_recurring(
            &seeded.doctor_user,
            RecurrenceRequest {
                clinic_id: seeded.clinic.id,
                start_date: start,
                end_date: start + Duration::days(7),
                days: vec!["moonday".to_string()],
                start_time: time(9, 0),
                end_time: time(11, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, SchedulingError::Validation(_));

    let err = service
        .create_recurring(
            &seeded.doctor_user,
            RecurrenceRequest {
                clinic_id: seeded.clinic.id,
                start_date: start,
                end_date: start - Duration::days(1),
                days: vec!["monday".to_string()],
                start_time: time(9, 0),
                end_time: time(11, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, SchedulingError::Validation(_));
}

#[tokio::test]
async fn deleting_the_group_removes_every_window() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let service = RecurrenceService::new(&state);
    let availability = scheduling_cell::services::AvailabilityService::new(&state);

    let start = Utc::now().date_naive() + Duration::days(1);
    service
        .create_recurring(
            &seeded.doctor_user,
            RecurrenceRequest {
                clinic_id: seeded.clinic.id,
                start_date: start,
                end_date: start + Duration::days(13),
                days: vec!["tuesday".to_string(), "saturday".to_string()],
                start_time: time(9, 0),
                end_time: time(10, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap();

    let windows = state.store.windows_for_doctor(seeded.doctor.id).await;
    let group = windows[0].recurrence_group.unwrap();

    let removed = availability
        .delete_recurrence_group(&seeded.doctor_user, group)
        .await
        .unwrap();
    assert_eq!(removed, windows.len());
    assert!(state.store.windows_for_doctor(seeded.doctor.id).await.is_empty());
}
