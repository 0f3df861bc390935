use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_store::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn create_clinic_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(create_clinic))
        .route("/mine", get(my_clinics))
        .route("/{id}", get(get_clinic))
        .route("/{id}/affiliations", get(clinic_affiliations))
        .route("/doctors", post(register_doctor))
        .route("/doctors/{id}/verify", put(verify_doctor))
        .route("/affiliations", post(request_affiliation))
        .route("/affiliations/mine", get(my_affiliations))
        .route("/affiliations/{id}/approve", post(approve_affiliation))
        .route("/affiliations/{id}/reject", post(reject_affiliation))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
