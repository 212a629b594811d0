//! Public API routes.
//!
//! All routes merged here share the by-method tier selector: reads are
//! counted against the read tier, everything else against write.

pub mod auth;
pub mod inventory;
pub mod resources;

use axum::{routing::post, Router};

use crate::http::server::AppState;
use crate::records::{Booking, Employee, InventoryItem, Issue, Supplier};

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(resources::router::<Booking>("/booking"))
        .merge(resources::router::<InventoryItem>("/inventory"))
        .route("/inventory/sendmail", post(inventory::send_low_stock))
        .merge(resources::router::<Employee>("/employee"))
        .merge(resources::router::<Supplier>("/supplier"))
        .merge(resources::router::<Issue>("/issue"))
}
