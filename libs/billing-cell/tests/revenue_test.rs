use assert_matches::assert_matches;
use chrono::{Duration, NaiveTime, Utc};

use appointment_cell::models::BookAppointmentRequest;
use appointment_cell::services::BookingService;
use billing_cell::models::{BillingError, CreateOrderRequest, SetFeeRequest, VerifyPaymentRequest};
use billing_cell::provider::sign_callback;
use billing_cell::services::{EarningsService, FeeService, PaymentService, Reconciler};
use scheduling_cell::models::CreateWindowRequest;
use scheduling_cell::services::AvailabilityService;
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::records::{Appointment, AppointmentStatus, PaymentStatus, TimeSlot};
use shared_store::AppState;
use shared_utils::test_utils::{auth_user, seed_clinic, SeededClinic};

const GATEWAY_SECRET: &str = "gateway-secret";

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "test-secret".to_string(),
        payment_key_id: "key_test".to_string(),
        payment_key_secret: GATEWAY_SECRET.to_string(),
        payment_currency: "INR".to_string(),
        notify_webhook_url: None,
    }
}

async fn setup() -> (AppState, SeededClinic, Vec<TimeSlot>) {
    let state = AppState::new(test_config());
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
    let slots = state.store.free_slots_on(seeded.doctor.id, tomorrow).await;
    (state, seeded, slots)
}

async fn set_percent_policy(state: &AppState, seeded: &SeededClinic) {
    FeeService::new(state)
        .set_fee(
            &seeded.doctor_user,
            SetFeeRequest {
                clinic_id: seeded.clinic.id,
                consultation_fee: 1000.0,
                clinic_share_percent: 20.0,
                clinic_fixed_fee: None,
            },
        )
        .await
        .unwrap();
}

async fn book(state: &AppState, seeded: &SeededClinic, slot: &TimeSlot) -> Appointment {
    BookingService::new(state)
        .book(
            &seeded.patient_user,
            BookAppointmentRequest {
                doctor_id: seeded.doctor.id,
                clinic_id: seeded.clinic.id,
                slot_id: slot.id,
                notes: None,
            },
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn payment_verification_confirms_and_reconciles() {
    let (state, seeded, slots) = setup().await;
    set_percent_policy(&state, &seeded).await;
    let appointment = book(&state, &seeded, &slots[0]).await;
    assert_eq!(appointment.amount, 1000.0);

    let payments = PaymentService::new(&state);
    let order = payments
        .create_order(
            &seeded.patient_user,
            CreateOrderRequest {
                token: appointment.token.clone(),
            },
        )
        .await
        .unwrap();
    assert_eq!(order.amount, 1000.0);
    assert_eq!(order.currency, "INR");

    let signature = sign_callback(GATEWAY_SECRET, &order.order_reference, "pay_001");
    let confirmed = payments
        .verify_payment(VerifyPaymentRequest {
            order_reference: order.order_reference.clone(),
            payment_reference: "pay_001".to_string(),
            signature,
        })
        .await
        .unwrap();

    assert!(confirmed.paid);
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    let record = state
        .store
        .revenue_for_appointment(appointment.id)
        .await
        .expect("revenue record should exist");
    assert_eq!(record.total_fee, 1000.0);
    assert_eq!(record.clinic_share, 200.0);
    assert_eq!(record.doctor_earning, 800.0);
}

#[tokio::test]
async fn reconciliation_is_idempotent() {
    let (state, seeded, slots) = setup().await;
    set_percent_policy(&state, &seeded).await;
    let appointment = book(&state, &seeded, &slots[0]).await;

    let payments = PaymentService::new(&state);
    let order = payments
        .create_order(
            &seeded.patient_user,
            CreateOrderRequest {
                token: appointment.token.clone(),
            },
        )
        .await
        .unwrap();
    let signature = sign_callback(GATEWAY_SECRET, &order.order_reference, "pay_002");
    payments
        .verify_payment(VerifyPaymentRequest {
            order_reference: order.order_reference.clone(),
            payment_reference: "pay_002".to_string(),
            signature,
        })
        .await
        .unwrap();

    // Driving the reconciler again for the same payment changes nothing.
    let payment = state.store.payment_by_order(&order.order_reference).await.unwrap();
    let applied = Reconciler::new(&state).reconcile(&payment).await.unwrap();
    assert!(!applied);
    assert_eq!(state.store.revenue_for_doctor(seeded.doctor.id).await.len(), 1);
}

#[tokio::test]
async fn bad_signature_blocks_confirmation() {
    let (state, seeded, slots) = setup().await;
    set_percent_policy(&state, &seeded).await;
    let appointment = book(&state, &seeded, &slots[0]).await;

    let payments = PaymentService::new(&state);
    let order = payments
        .create_order(
            &seeded.patient_user,
            CreateOrderRequest {
                token: appointment.token.clone(),
            },
        )
        .await
        .unwrap();

    let err = payments
        .verify_payment(VerifyPaymentRequest {
            order_reference: order.order_reference.clone(),
            payment_reference: "pay_003".to_string(),
            signature: "forged".to_string(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, BillingError::Validation(_));

    let unchanged = state.store.get_appointment(appointment.id).await.unwrap();
    assert!(!unchanged.paid);
    assert!(state.store.revenue_for_appointment(appointment.id).await.is_none());
}

#[tokio::test]
async fn missing_fee_policy_skips_reconciliation() {
    let (state, seeded, slots) = setup().await;
    // No policy: the booking falls back to the doctor's default fee.
    let appointment = book(&state, &seeded, &slots[0]).await;
    assert_eq!(appointment.amount, seeded.doctor.fee);

    let payments = PaymentService::new(&state);
    let order = payments
        .create_order(
            &seeded.patient_user,
            CreateOrderRequest {
                token: appointment.token.clone(),
            },
        )
        .await
        .unwrap();
    let signature = sign_callback(GATEWAY_SECRET, &order.order_reference, "pay_004");
    let confirmed = payments
        .verify_payment(VerifyPaymentRequest {
            order_reference: order.order_reference,
            payment_reference: "pay_004".to_string(),
            signature,
        })
        .await
        .unwrap();

    // The payment stands even though there was nothing to split.
    assert!(confirmed.paid);
    assert!(state.store.revenue_for_appointment(appointment.id).await.is_none());
}

#[tokio::test]
async fn fixed_fee_split_is_clamped_end_to_end() {
    let (state, seeded, slots) = setup().await;
    FeeService::new(&state)
        .set_fee(
            &seeded.doctor_user,
            SetFeeRequest {
                clinic_id: seeded.clinic.id,
                consultation_fee: 1000.0,
                clinic_share_percent: 0.0,
                clinic_fixed_fee: Some(1500.0),
            },
        )
        .await
        .unwrap();
    let appointment = book(&state, &seeded, &slots[0]).await;

    let payments = PaymentService::new(&state);
    let order = payments
        .create_order(
            &seeded.patient_user,
            CreateOrderRequest {
                token: appointment.token.clone(),
            },
        )
        .await
        .unwrap();
    let signature = sign_callback(GATEWAY_SECRET, &order.order_reference, "pay_005");
    payments
        .verify_payment(VerifyPaymentRequest {
            order_reference: order.order_reference,
            payment_reference: "pay_005".to_string(),
            signature,
        })
        .await
        .unwrap();

    let record = state.store.revenue_for_appointment(appointment.id).await.unwrap();
    assert_eq!(record.clinic_share, 1000.0);
    assert_eq!(record.doctor_earning, 0.0);
}

#[tokio::test]
async fn revenue_survives_a_later_cancellation() {
    let (state, seeded, slots) = setup().await;
    set_percent_policy(&state, &seeded).await;
    let appointment = book(&state, &seeded, &slots[0]).await;

    let payments = PaymentService::new(&state);
    let order = payments
        .create_order(
            &seeded.patient_user,
            CreateOrderRequest {
                token: appointment.token.clone(),
            },
        )
        .await
        .unwrap();
    let signature = sign_callback(GATEWAY_SECRET, &order.order_reference, "pay_006");
    payments
        .verify_payment(VerifyPaymentRequest {
            order_reference: order.order_reference,
            payment_reference: "pay_006".to_string(),
            signature,
        })
        .await
        .unwrap();

    BookingService::new(&state)
        .cancel(&seeded.patient_user, appointment.id)
        .await
        .unwrap();

    // The audit trail is immutable; cancellation does not claw back revenue.
    let record = state.store.revenue_for_appointment(appointment.id).await.unwrap();
    assert_eq!(record.doctor_earning, 800.0);
}

#[tokio::test]
async fn late_payment_never_resurrects_a_cancelled_appointment() {
    let (state, seeded, slots) = setup().await;
    set_percent_policy(&state, &seeded).await;
    let appointment = book(&state, &seeded, &slots[0]).await;

    let payments = PaymentService::new(&state);
    let order = payments
        .create_order(
            &seeded.patient_user,
            CreateOrderRequest {
                token: appointment.token.clone(),
            },
        )
        .await
        .unwrap();

    // The patient cancels while the gateway checkout is still open.
    BookingService::new(&state)
        .cancel(&seeded.patient_user, appointment.id)
        .await
        .unwrap();

    let signature = sign_callback(GATEWAY_SECRET, &order.order_reference, "pay_010");
    let outcome = payments
        .verify_payment(VerifyPaymentRequest {
            order_reference: order.order_reference.clone(),
            payment_reference: "pay_010".to_string(),
            signature,
        })
        .await
        .unwrap();

    assert_eq!(outcome.status, AppointmentStatus::Cancelled);
    assert!(!outcome.paid);

    // The money is on record for a refund, but nothing else moves: no
    // revenue record, and the released slot stays free.
    let payment = state.store.payment_by_order(&order.order_reference).await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert!(state.store.revenue_for_appointment(appointment.id).await.is_none());
    assert!(!state.store.get_slot(slots[0].id).await.unwrap().is_booked);
}

#[tokio::test]
async fn earnings_summaries_reflect_reconciled_revenue() {
    let (state, seeded, slots) = setup().await;
    set_percent_policy(&state, &seeded).await;
    let appointment = book(&state, &seeded, &slots[0]).await;

    let payments = PaymentService::new(&state);
    let order = payments
        .create_order(
            &seeded.patient_user,
            CreateOrderRequest {
                token: appointment.token.clone(),
            },
        )
        .await
        .unwrap();
    let signature = sign_callback(GATEWAY_SECRET, &order.order_reference, "pay_007");
    payments
        .verify_payment(VerifyPaymentRequest {
            order_reference: order.order_reference,
            payment_reference: "pay_007".to_string(),
            signature,
        })
        .await
        .unwrap();

    let earnings = EarningsService::new(&state);
    let doctor = earnings.doctor_earnings(&seeded.doctor_user).await.unwrap();
    assert_eq!(doctor.today, 800.0);
    assert_eq!(doctor.this_month, 800.0);
    assert_eq!(doctor.total, 800.0);

    let revenue = earnings
        .clinic_revenue(&seeded.owner, seeded.clinic.id)
        .await
        .unwrap();
    assert_eq!(revenue.total_collected, 1000.0);
    assert_eq!(revenue.clinic_share, 200.0);
    assert_eq!(revenue.records.len(), 1);

    let stranger = auth_user(Role::ClinicOwner, "Someone Else");
    let err = earnings
        .clinic_revenue(&stranger, seeded.clinic.id)
        .await
        .unwrap_err();
    assert_matches!(err, BillingError::Forbidden(_));
}

#[tokio::test]
async fn paying_twice_is_rejected() {
    let (state, seeded, slots) = setup().await;
    set_percent_policy(&state, &seeded).await;
    let appointment = book(&state, &seeded, &slots[0]).await;

    let payments = PaymentService::new(&state);
    let order = payments
        .create_order(
            &seeded.patient_user,
            CreateOrderRequest {
                token: appointment.token.clone(),
            },
        )
        .await
        .unwrap();
    let signature = sign_callback(GATEWAY_SECRET, &order.order_reference, "pay_008");
    payments
        .verify_payment(VerifyPaymentRequest {
            order_reference: order.order_reference,
            payment_reference: "pay_008".to_string(),
            signature,
        })
        .await
        .unwrap();

    let err = payments
        .create_order(
            &seeded.patient_user,
            CreateOrderRequest {
                token: appointment.token.clone(),
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, BillingError::Conflict(_));
}
