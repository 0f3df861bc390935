use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_store::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn create_notification_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_notifications))
        .route("/{id}/read", post(mark_notification_read))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
