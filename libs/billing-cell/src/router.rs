use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_store::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn create_billing_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/fees", post(set_fee_policy))
        .route("/fees/mine", get(my_fee_policies))
        .route("/orders", post(create_payment_order))
        .route("/payments/verify", post(verify_payment))
        .route("/earnings/doctor", get(doctor_earnings))
        .route("/revenue/clinic/{id}", get(clinic_revenue))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
