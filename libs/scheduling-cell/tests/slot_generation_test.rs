use assert_matches::assert_matches;
use chrono::{Duration, NaiveTime, Utc};

use scheduling_cell::models::{CreateWindowRequest, SchedulingError};
use scheduling_cell::services::{generate_slots_for_window, AvailabilityService};
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
async fn divisible_window_produces_exact_slot_count() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let service = AvailabilityService::new(&state);
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    let (window, created) = service
        .create_window(
            &seeded.doctor_user,
            CreateWindowRequest {
                clinic_id: seeded.clinic.id,
                date: tomorrow,
                start_time: time(9, 0),
                end_time: time(11, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap();

    assert_eq!(created, 4);
    let slots = state.store.free_slots_on(window.doctor_id, tomorrow).await;
    assert_eq!(slots.len(), 4);
    assert_eq!(slots[0].start.time(), time(9, 0));
    assert_eq!(slots[3].end.time(), time(11, 0));
}

#[tokio::test]
async fn partial_trailing_slot_is_never_created() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let service = AvailabilityService::new(&state);
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    // 105 minutes at 30-minute steps: three full slots, remainder dropped.
    let (_, created) = service
        .create_window(
            &seeded.doctor_user,
            CreateWindowRequest {
                clinic_id: seeded.clinic.id,
                date: tomorrow,
                start_time: time(9, 0),
                end_time: time(10, 45),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap();

    assert_eq!(created, 3);
    let slots = state.store.free_slots_on(seeded.doctor.id, tomorrow).await;
    assert_eq!(slots.last().unwrap().end.time(), time(10, 30));
}

#[tokio::test]
async fn window_shorter_than_duration_yields_no_slots() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let service = AvailabilityService::new(&state);
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    let (_, created) = service
        .create_window(
            &seeded.doctor_user,
            CreateWindowRequest {
                clinic_id: seeded.clinic.id,
                date: tomorrow,
                start_time: time(9, 0),
                end_time: time(9, 20),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap();
    assert_eq!(created, 0);
}

#[tokio::test]
async fn regeneration_is_idempotent() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let service = AvailabilityService::new(&state);
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    let (window, first) = service
        .create_window(
            &seeded.doctor_user,
            CreateWindowRequest {
                clinic_id: seeded.clinic.id,
                date: tomorrow,
                start_time: time(9, 0),
                end_time: time(11, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap();
    assert_eq!(first, 4);

    let second = generate_slots_for_window(&state.store, &window).await;
    assert_eq!(second, 0);
    assert_eq!(state.store.free_slots_on(seeded.doctor.id, tomorrow).await.len(), 4);
}

#[tokio::test]
async fn rejects_past_dates_and_inverted_times() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let service = AvailabilityService::new(&state);
    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    let err = service
        .create_window(
            &seeded.doctor_user,
            CreateWindowRequest {
                clinic_id: seeded.clinic.id,
                date: yesterday,
                start_time: time(9, 0),
                end_time: time(11, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, SchedulingError::Validation(_));

    let err = service
        .create_window(
            &seeded.doctor_user,
            CreateWindowRequest {
                clinic_id: seeded.clinic.id,
                date: tomorrow,
                start_time: time(11, 0),
                end_time: time(9, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, SchedulingError::Validation(_));
}

#[tokio::test]
async fn requires_an_approved_affiliation() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let other = seed_clinic(&state.store).await;
    let service = AvailabilityService::new(&state);
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    // Doctor from the first clinic has no affiliation with the second.
    let err = service
        .create_window(
            &seeded.doctor_user,
            CreateWindowRequest {
                clinic_id: other.clinic.id,
                date: tomorrow,
                start_time: time(9, 0),
                end_time: time(11, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, SchedulingError::Forbidden(_));
}

#[tokio::test]
async fn booked_slots_survive_day_regeneration() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let service = AvailabilityService::new(&state);
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    service
        .create_window(
            &seeded.doctor_user,
            CreateWindowRequest {
                clinic_id: seeded.clinic.id,
                date: tomorrow,
                start_time: time(9, 0),
                end_time: time(10, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap();

    let slots = state.store.free_slots_on(seeded.doctor.id, tomorrow).await;
    let booked_id = slots[0].id;
    state
        .store
        .book_slot(
            booked_id,
            shared_models::records::Appointment {
                id: uuid::Uuid::new_v4(),
                patient_id: seeded.patient.id,
                doctor_id: seeded.doctor.id,
                clinic_id: seeded.clinic.id,
                slot_id: Some(booked_id),
                status: shared_models::records::AppointmentStatus::Pending,
                amount: 500.0,
                paid: false,
                token: "T1-TEST".to_string(),
                notes: String::new(),
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();

    // Resubmitting the day with different hours clears only the free slots.
    service
        .create_window(
            &seeded.doctor_user,
            CreateWindowRequest {
                clinic_id: seeded.clinic.id,
                date: tomorrow,
                start_time: time(14, 0),
                end_time: time(15, 0),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap();

    let booked = state.store.get_slot(booked_id).await.unwrap();
    assert!(booked.is_booked);
    let free = state.store.free_slots_on(seeded.doctor.id, tomorrow).await;
    assert_eq!(free.len(), 2);
    assert!(free.iter().all(|s| s.start.time() >= time(14, 0)));
}

#[tokio::test]
async fn booked_slot_refuses_deletion() {
    let state = test_state();
    let seeded = seed_clinic(&state.store).await;
    let service = AvailabilityService::new(&state);
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    service
        .create_window(
            &seeded.doctor_user,
            CreateWindowRequest {
                clinic_id: seeded.clinic.id,
                date: tomorrow,
                start_time: time(9, 0),
                end_time: time(9, 30),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap();
    let slot = state.store.free_slots_on(seeded.doctor.id, tomorrow).await[0].clone();

    // Free slots delete fine.
    service.delete_slot(&seeded.doctor_user, slot.id).await.unwrap();

    let (window, _) = service
        .create_window(
            &seeded.doctor_user,
            CreateWindowRequest {
                clinic_id: seeded.clinic.id,
                date: tomorrow,
                start_time: time(10, 0),
                end_time: time(10, 30),
                slot_duration_minutes: 30,
            },
        )
        .await
        .unwrap();
    let slot = state.store.free_slots_on(window.doctor_id, tomorrow).await[0].clone();
    state
        .store
        .book_slot(
            slot.id,
            shared_models::records::Appointment {
                id: uuid::Uuid::new_v4(),
                patient_id: seeded.patient.id,
                doctor_id: seeded.doctor.id,
                clinic_id: seeded.clinic.id,
                slot_id: Some(slot.id),
                status: shared_models::records::AppointmentStatus::Pending,
                amount: 500.0,
                paid: false,
                token: "T1-BOOK".to_string(),
                notes: String::new(),
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();

    let err = service.delete_slot(&seeded.doctor_user, slot.id).await.unwrap_err();
    assert_matches!(err, SchedulingError::Conflict(_));
}
