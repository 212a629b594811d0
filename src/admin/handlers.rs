use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::records::booking::BookingReview;
use crate::records::inventory::total_units;
use crate::records::{Booking, Record, Validate, WriteContext};
use crate::routes::resources::parse_id;
use crate::security::projection::{project, project_all, sanitize};
use crate::security::rate_limit::ClientKey;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub bookings: usize,
    pub inventory_items: usize,
    pub inventory_units: u64,
    pub employees: usize,
    pub suppliers: usize,
    pub issues: usize,
    pub rate_limit_buckets: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

pub async fn get_stats(State(state): State<AppState>) -> Json<Stats> {
    let store = &state.store;
    Json(Stats {
        bookings: store.bookings.len(),
        inventory_items: store.inventory.len(),
        inventory_units: total_units(&store.inventory.list()),
        employees: store.employees.len(),
        suppliers: store.suppliers.len(),
        issues: store.issues.len(),
        rate_limit_buckets: state.gate.bucket_count(),
    })
}

/// Bookings through the admin allow-list.
pub async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let bookings = state.store.bookings.list();
    let body = project_all(&bookings, &Booking::ADMIN).map_err(ApiError::internal)?;
    Ok(Json(body))
}

/// Change a booking's status or reviewed flag.
pub async fn review_booking(
    State(state): State<AppState>,
    ClientKey(client): ClientKey,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let Json(raw) = payload?;
    let review: BookingReview = serde_json::from_value(sanitize(&raw, &Booking::REVIEW_INPUT))
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    review.validate()?;

    let ctx = WriteContext::new(client);
    let booking = state
        .store
        .bookings
        .update(&id, |booking| booking.review(review, &ctx))
        .ok_or(ApiError::NotFound(Booking::LABEL))?;

    tracing::info!(%id, status = ?booking.status, reviewed = booking.reviewed, "Booking reviewed");
    let body = project(&booking, &Booking::ADMIN).map_err(ApiError::internal)?;
    Ok(Json(body))
}
