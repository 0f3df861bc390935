use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::create_appointment_router;
use billing_cell::router::create_billing_router;
use clinic_cell::router::create_clinic_router;
use notification_cell::router::create_notification_router;
use scheduling_cell::router::create_scheduling_router;
use shared_store::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic scheduling API is running!" }))
        .nest("/clinics", create_clinic_router(state.clone()))
        .nest("/scheduling", create_scheduling_router(state.clone()))
        .nest("/appointments", create_appointment_router(state.clone()))
        .nest("/billing", create_billing_router(state.clone()))
        .nest("/notifications", create_notification_router(state))
}
