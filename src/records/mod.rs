//! Stored resources and their allow-lists.
//!
//! # Data Flow
//! ```text
//! raw JSON body
//!     → sanitize (Record::INPUT)
//!     → Record::Draft (serde) → Validate
//!     → Record::create / Record::apply
//!     → store::Collection
//!     → project (Record::PUBLIC)
//! ```
//!
//! Drafts are the only way to build or change a record, and [`parse_draft`]
//! is the only way to get a draft from a request body.

pub mod booking;
pub mod employee;
pub mod inventory;
pub mod issue;
pub mod supplier;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::security::projection::{sanitize, FieldSpec};
use crate::store::{Collection, Store};

pub use booking::{Booking, BookingStatus};
pub use employee::Employee;
pub use inventory::InventoryItem;
pub use issue::{Issue, IssueStatus};
pub use supplier::Supplier;

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field {field}: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), FieldError>;
}

/// Who is writing, and when.
#[derive(Debug, Clone)]
pub struct WriteContext {
    pub client: String,
    pub now: DateTime<Utc>,
}

impl WriteContext {
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            now: Utc::now(),
        }
    }
}

/// A resource kind served by the generic CRUD routes.
pub trait Record: Serialize + Clone + Send + Sync + 'static {
    type Draft: DeserializeOwned + Validate + Send;

    /// Human name used in messages, e.g. "Booking".
    const LABEL: &'static str;
    /// Fields a caller may set.
    const INPUT: FieldSpec;
    /// Fields a caller may see.
    const PUBLIC: FieldSpec;

    fn id(&self) -> Uuid;
    fn create(id: Uuid, draft: Self::Draft, ctx: &WriteContext) -> Self;
    fn apply(&mut self, draft: Self::Draft, ctx: &WriteContext);
    fn collection(store: &Store) -> &Collection<Self>;
}

/// Sanitize a raw body against `R::INPUT`, then deserialize and validate.
pub fn parse_draft<R: Record>(raw: &Value) -> Result<R::Draft, ApiError> {
    let payload = sanitize(raw, &R::INPUT);
    let dropped = field_count(raw).saturating_sub(field_count(&payload));
    if dropped > 0 {
        tracing::debug!(allow_list = R::INPUT.name, dropped, "Dropped fields outside allow-list");
    }
    let draft: R::Draft =
        serde_json::from_value(payload).map_err(|e| ApiError::Validation(e.to_string()))?;
    draft.validate()?;
    Ok(draft)
}

fn field_count(value: &Value) -> usize {
    value.as_object().map_or(0, |object| object.len())
}

pub(crate) fn required(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError {
            field,
            reason: "must not be empty",
        });
    }
    Ok(())
}

pub(crate) fn email(field: &'static str, value: &str) -> Result<(), FieldError> {
    let invalid = FieldError {
        field,
        reason: "must be a valid email address",
    };
    let (local, domain) = value.trim().split_once('@').ok_or(invalid.clone())?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(invalid);
    }
    Ok(())
}

pub(crate) fn amount(field: &'static str, value: f64) -> Result<(), FieldError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FieldError {
            field,
            reason: "must be a non-negative number",
        });
    }
    Ok(())
}

pub(crate) fn clock_time(field: &'static str, value: &str) -> Result<(), FieldError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| FieldError {
            field,
            reason: "must be HH:MM",
        })
}

pub(crate) fn not_in_past(field: &'static str, date: NaiveDate, now: DateTime<Utc>) -> Result<(), FieldError> {
    if date < now.date_naive() {
        return Err(FieldError {
            field,
            reason: "must not be in the past",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(email("email", "jo@garage.lk").is_ok());
        assert!(email("email", "jo@garage").is_err());
        assert!(email("email", "@garage.lk").is_err());
        assert!(email("email", "jo@@garage.lk").is_err());
        assert!(email("email", "jo.garage.lk").is_err());
    }

    #[test]
    fn field_error_message_names_field() {
        let err: ApiError = required("name", "  ").unwrap_err().into();
        assert_eq!(err.to_string(), "invalid field name: must not be empty");
    }

    #[test]
    fn amounts_reject_negative_and_nan() {
        assert!(amount("unitPrice", 0.0).is_ok());
        assert!(amount("unitPrice", -1.0).is_err());
        assert!(amount("unitPrice", f64::NAN).is_err());
    }

    #[test]
    fn clock_time_format() {
        assert!(clock_time("time", "09:30").is_ok());
        assert!(clock_time("time", "25:00").is_err());
        assert!(clock_time("time", "9.30am").is_err());
    }
}
