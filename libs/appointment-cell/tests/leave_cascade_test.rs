use assert_matches::assert_matches;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};

use appointment_cell::models::{AppointmentError, BookAppointmentRequest, LeaveRequest};
use appointment_cell::services::{BookingService, LeaveService};
use scheduling_cell::models::CreateWindowRequest;
use scheduling_cell::services::AvailabilityService;
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::records::AppointmentStatus;
use shared_store::AppState;
use shared_utils::test_utils::{auth_user, seed_clinic, SeededClinic};

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn setup() -> (AppState, SeededClinic, NaiveDate) {
    let state = AppState::new(AppConfig::default());
    let seeded = seed_clinic(&state.store).await;
    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    AvailabilityService::new(&state)
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
    (state, seeded, tomorrow)
}

#[tokio::test]
async fn leave_cancels_every_live_appointment_and_blocks_the_day() {
    let (state, seeded, date) = setup().await;
    let booking = BookingService::new(&state);
    let slots = state.store.free_slots_on(seeded.doctor.id, date).await;
    assert_eq!(slots.len(), 4);

    let other_patient = auth_user(Role::Patient, "Nina Das");
    let first = booking
        .book(
            &seeded.patient_user,
            BookAppointmentRequest {
                doctor_id: seeded.doctor.id,
                clinic_id: seeded.clinic.id,
                slot_id: slots[0].id,
                notes: None,
            },
        )
        .await
        .unwrap();
    let second = booking
        .book(
            &other_patient,
            BookAppointmentRequest {
                doctor_id: seeded.doctor.id,
                clinic_id: seeded.clinic.id,
                slot_id: slots[1].id,
                notes: None,
            },
        )
        .await
        .unwrap();

    let outcome = LeaveService::new(&state)
        .apply_leave(
            &seeded.doctor_user,
            LeaveRequest {
                clinic_id: seeded.clinic.id,
                date,
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.cancelled.len(), 2);
    assert_eq!(outcome.slots_blocked, 4);

    for id in [first.id, second.id] {
        let appointment = state.store.get_appointment(id).await.unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Cancelled);
        assert!(appointment.notes.contains("doctor's leave"));
    }

    // Every slot on the day is blocked, booked or not.
    assert!(state.store.free_slots_on(seeded.doctor.id, date).await.is_empty());

    // Each affected patient got a notification.
    for patient_id in [seeded.patient.id, other_patient.id] {
        let notifications = state.store.notifications_for_user(patient_id).await;
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].message.contains("doctor's leave"));
    }
}

#[tokio::test]
async fn leave_on_an_empty_day_just_blocks_slots() {
    let (state, seeded, date) = setup().await;

    let outcome = LeaveService::new(&state)
        .apply_leave(
            &seeded.doctor_user,
            LeaveRequest {
                clinic_id: seeded.clinic.id,
                date,
            },
        )
        .await
        .unwrap();

    assert!(outcome.cancelled.is_empty());
    assert_eq!(outcome.slots_blocked, 4);
}

#[tokio::test]
async fn cancelled_appointments_are_not_cancelled_twice() {
    let (state, seeded, date) = setup().await;
    let booking = BookingService::new(&state);
    let slots = state.store.free_slots_on(seeded.doctor.id, date).await;

    let appointment = booking
        .book(
            &seeded.patient_user,
            BookAppointmentRequest {
                doctor_id: seeded.doctor.id,
                clinic_id: seeded.clinic.id,
                slot_id: slots[0].id,
                notes: None,
            },
        )
        .await
        .unwrap();
    booking.cancel(&seeded.patient_user, appointment.id).await.unwrap();

    let outcome = LeaveService::new(&state)
        .apply_leave(
            &seeded.doctor_user,
            LeaveRequest {
                clinic_id: seeded.clinic.id,
                date,
            },
        )
        .await
        .unwrap();

    // The already-cancelled appointment is not part of the cascade.
    assert!(outcome.cancelled.is_empty());
    assert!(state
        .store
        .notifications_for_user(seeded.patient.id)
        .await
        .is_empty());
}

#[tokio::test]
async fn leave_requires_an_affiliated_clinic() {
    let (state, seeded, date) = setup().await;
    let other = seed_clinic(&state.store).await;

    let err = LeaveService::new(&state)
        .apply_leave(
            &seeded.doctor_user,
            LeaveRequest {
                clinic_id: other.clinic.id,
                date,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, AppointmentError::Forbidden(_));
}
