use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_store::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn create_appointment_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(book_appointment))
        .route("/mine", get(my_appointments))
        .route("/doctor/mine", get(doctor_appointments))
        .route("/clinic/{id}", get(clinic_appointments))
        .route("/{id}/cancel", post(cancel_appointment))
        .route("/leave", post(declare_leave))
        .route("/follow-up", post(book_follow_up))
        .route("/walk-in", post(book_walk_in))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
