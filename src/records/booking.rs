//! Service bookings made by customers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{clock_time, email, not_in_past, required, FieldError, Record, Validate, WriteContext};
use crate::security::projection::FieldSpec;
use crate::store::{Collection, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub vehicle_number: String,
    pub vehicle_model: String,
    pub service_type: String,
    pub date: NaiveDate,
    pub time: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Not in PUBLIC.
    pub source_address: String,
    pub reviewed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub vehicle_number: String,
    pub vehicle_model: String,
    pub service_type: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for BookingDraft {
    fn validate(&self) -> Result<(), FieldError> {
        required("customerName", &self.customer_name)?;
        email("email", &self.email)?;
        required("phone", &self.phone)?;
        required("vehicleNumber", &self.vehicle_number)?;
        required("vehicleModel", &self.vehicle_model)?;
        required("serviceType", &self.service_type)?;
        not_in_past("date", self.date, Utc::now())?;
        clock_time("time", &self.time)
    }
}

/// Staff-side changes to a booking, accepted only on admin routes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReview {
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub reviewed: Option<bool>,
}

impl Validate for BookingReview {
    fn validate(&self) -> Result<(), FieldError> {
        if self.status.is_none() && self.reviewed.is_none() {
            return Err(FieldError {
                field: "status",
                reason: "status or reviewed is required",
            });
        }
        Ok(())
    }
}

impl Booking {
    pub const REVIEW_INPUT: FieldSpec = FieldSpec::new("booking.review", &["status", "reviewed"]);

    /// Admin view: public fields plus review state and origin.
    pub const ADMIN: FieldSpec = FieldSpec::new(
        "booking.admin",
        &[
            "id",
            "customerName",
            "email",
            "phone",
            "vehicleNumber",
            "vehicleModel",
            "serviceType",
            "date",
            "time",
            "notes",
            "status",
            "createdAt",
            "updatedAt",
            "reviewed",
            "sourceAddress",
        ],
    );

    pub fn review(&mut self, review: BookingReview, ctx: &WriteContext) {
        if let Some(status) = review.status {
            self.status = status;
        }
        if let Some(reviewed) = review.reviewed {
            self.reviewed = reviewed;
        }
        self.updated_at = ctx.now;
    }
}

impl Record for Booking {
    type Draft = BookingDraft;

    const LABEL: &'static str = "Booking";

    const INPUT: FieldSpec = FieldSpec::new(
        "booking.input",
        &[
            "customerName",
            "email",
            "phone",
            "vehicleNumber",
            "vehicleModel",
            "serviceType",
            "date",
            "time",
            "notes",
        ],
    );

    const PUBLIC: FieldSpec = FieldSpec::new(
        "booking.public",
        &[
            "id",
            "customerName",
            "email",
            "phone",
            "vehicleNumber",
            "vehicleModel",
            "serviceType",
            "date",
            "time",
            "notes",
            "status",
            "createdAt",
            "updatedAt",
        ],
    );

    fn id(&self) -> Uuid {
        self.id
    }

    fn create(id: Uuid, draft: BookingDraft, ctx: &WriteContext) -> Self {
        Self {
            id,
            customer_name: draft.customer_name,
            email: draft.email,
            phone: draft.phone,
            vehicle_number: draft.vehicle_number,
            vehicle_model: draft.vehicle_model,
            service_type: draft.service_type,
            date: draft.date,
            time: draft.time,
            notes: draft.notes,
            status: BookingStatus::Pending,
            created_at: ctx.now,
            updated_at: ctx.now,
            source_address: ctx.client.clone(),
            reviewed: false,
        }
    }

    fn apply(&mut self, draft: BookingDraft, ctx: &WriteContext) {
        self.customer_name = draft.customer_name;
        self.email = draft.email;
        self.phone = draft.phone;
        self.vehicle_number = draft.vehicle_number;
        self.vehicle_model = draft.vehicle_model;
        self.service_type = draft.service_type;
        self.date = draft.date;
        self.time = draft.time;
        self.notes = draft.notes;
        self.updated_at = ctx.now;
    }

    fn collection(store: &Store) -> &Collection<Self> {
        &store.bookings
    }
}
