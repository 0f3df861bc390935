use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_store::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn create_scheduling_router(state: Arc<AppState>) -> Router {
    // Patients browse free slots before they sign in, so the two slot
    // queries stay outside the auth layer.
    let public = Router::new()
        .route("/slots", get(free_slots))
        .route("/slots/dates", get(free_dates))
        .with_state(state.clone());

    Router::new()
        .route("/windows", post(create_window))
        .route("/windows/mine", get(my_windows))
        .route("/windows/recurring", post(create_recurring_windows))
        .route("/windows/{id}", delete(delete_window))
        .route("/windows/{id}/approve", put(approve_window))
        .route("/windows/{id}/reject", put(reject_window))
        .route("/windows/group/{id}", delete(delete_recurrence_group))
        .route("/slots/{id}", delete(delete_slot))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
        .merge(public)
}
