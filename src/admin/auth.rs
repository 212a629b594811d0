use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::routes::auth::token_matches;

/// Require `Authorization: Bearer <admin.api_key>`.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::Unauthorized("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized("Expected Bearer token"))?;

    if !token_matches(&state.config.admin.api_key, token) {
        tracing::warn!(path = %request.uri().path(), "Admin request with wrong key");
        return Err(ApiError::Forbidden("Invalid admin key"));
    }

    Ok(next.run(request).await)
}
