use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};

use shared_models::error::AppError;
use shared_store::AppState;

use crate::jwt::validate_token;

/// Validates the bearer token and attaches the `AuthUser` to the request.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = validate_token(auth.token(), &state.config.jwt_secret).map_err(AppError::Auth)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
