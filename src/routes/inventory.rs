//! Low-stock notification.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::config::ServiceConfig;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::mail::MailMessage;
use crate::records::inventory::{total_units, InventoryItem};

pub const SENT: &str = "Low stock notification sent";
pub const SUFFICIENT: &str = "Inventory level is sufficient";

/// Build the notification listing every item and its count.
pub fn low_stock_message(
    config: &ServiceConfig,
    items: &[InventoryItem],
    total: u64,
) -> MailMessage {
    let mut text = format!(
        "Total inventory units ({total}) are below the threshold of {}.\n\nCurrent stock:\n",
        config.inventory.low_stock_threshold
    );
    for item in items {
        text.push_str(&format!("- {} ({}): {}\n", item.name, item.category, item.quantity));
    }

    MailMessage {
        from: config.mail.from.clone(),
        to: config.mail.to.clone(),
        subject: "Low inventory alert".to_string(),
        text,
    }
}

/// `POST /inventory/sendmail`: notify when total units fall below threshold.
pub async fn send_low_stock(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let items = state.store.inventory.list();
    let total = total_units(&items);
    let threshold = state.config.inventory.low_stock_threshold;

    if total >= threshold {
        tracing::debug!(total, threshold, "Stock above threshold, no notification");
        return Ok(Json(json!({
            "success": SUFFICIENT,
            "totalUnits": total,
            "threshold": threshold,
        })));
    }

    let message = low_stock_message(&state.config, &items, total);
    state.mailer.send(&message).await.map_err(ApiError::internal)?;

    tracing::info!(total, threshold, "Low stock notification dispatched");
    Ok(Json(json!({
        "success": SENT,
        "totalUnits": total,
        "threshold": threshold,
    })))
}
