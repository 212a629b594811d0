//! Admin dashboard API.
//!
//! Every route here requires the admin bearer key and is counted against
//! the admin tier.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, patch},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/stats", get(get_stats))
        .route("/admin/bookings", get(list_bookings))
        .route("/admin/bookings/{id}", patch(review_booking))
        .layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
