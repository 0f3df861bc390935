use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, NaiveTime, Utc};
use tower::ServiceExt;

use scheduling_cell::models::CreateWindowRequest;
use scheduling_cell::router::create_scheduling_router;
use scheduling_cell::services::AvailabilityService;
use shared_config::AppConfig;
use shared_store::AppState;
use shared_utils::test_utils::seed_clinic;

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
async fn slot_queries_work_without_a_token() {
    let state = Arc::new(AppState::new(AppConfig::default()));
    let seeded = seed_clinic(&state.store).await;
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    let service = AvailabilityService::new(&state);
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

    let router = create_scheduling_router(state.clone());

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/slots?doctor_id={}&date={}",
                    seeded.doctor.id, tomorrow
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/slots/dates?doctor_id={}", seeded.doctor.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn window_routes_still_demand_a_token() {
    let state = Arc::new(AppState::new(AppConfig::default()));
    let router = create_scheduling_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/windows/mine")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
