//! Session token verification.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use subtle::ConstantTimeEq;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::security::projection::{sanitize, FieldSpec};

const VERIFY_INPUT: FieldSpec = FieldSpec::new("auth.verify", &["token"]);

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    token: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/verify", post(verify))
}

/// Constant-time token comparison.
///
/// A length mismatch still runs a full comparison of `expected` against
/// itself before failing.
pub(crate) fn token_matches(expected: &str, presented: &str) -> bool {
    let (expected, presented) = (expected.as_bytes(), presented.as_bytes());
    if expected.len() != presented.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    expected.ct_eq(presented).into()
}

async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(raw) = payload?;
    let request: VerifyRequest = serde_json::from_value(sanitize(&raw, &VERIFY_INPUT))
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if !token_matches(&state.config.admin.api_key, &request.token) {
        tracing::warn!("Token verification failed");
        return Err(ApiError::Unauthorized("Invalid token"));
    }

    Ok(Json(json!({ "valid": true, "role": "admin" })))
}
