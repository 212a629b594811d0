//! Customer-reported issues, optionally tied to a booking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{email, required, FieldError, Record, Validate, WriteContext};
use crate::security::projection::FieldSpec;
use crate::store::{Collection, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Open,
    Resolved,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub booking_id: Option<Uuid>,
    pub email: String,
    pub status: IssueStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub source_address: String,
    pub triage_note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub booking_id: Option<Uuid>,
    pub email: String,
}

impl Validate for IssueDraft {
    fn validate(&self) -> Result<(), FieldError> {
        required("title", &self.title)?;
        required("description", &self.description)?;
        email("email", &self.email)
    }
}

impl Record for Issue {
    type Draft = IssueDraft;

    const LABEL: &'static str = "Issue";

    const INPUT: FieldSpec =
        FieldSpec::new("issue.input", &["title", "description", "bookingId", "email"]);

    const PUBLIC: FieldSpec = FieldSpec::new(
        "issue.public",
        &[
            "id",
            "title",
            "description",
            "bookingId",
            "email",
            "status",
            "createdAt",
            "updatedAt",
        ],
    );

    fn id(&self) -> Uuid {
        self.id
    }

    fn create(id: Uuid, draft: IssueDraft, ctx: &WriteContext) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            booking_id: draft.booking_id,
            email: draft.email,
            status: IssueStatus::Open,
            created_at: ctx.now,
            updated_at: ctx.now,
            source_address: ctx.client.clone(),
            triage_note: None,
        }
    }

    fn apply(&mut self, draft: IssueDraft, ctx: &WriteContext) {
        self.title = draft.title;
        self.description = draft.description;
        self.booking_id = draft.booking_id;
        self.email = draft.email;
        self.updated_at = ctx.now;
    }

    fn collection(store: &Store) -> &Collection<Self> {
        &store.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::parse_draft;
    use serde_json::json;

    #[test]
    fn caller_cannot_resolve_or_triage_on_create() {
        let raw = json!({
            "title": "Scratch on door",
            "description": "Found after pickup",
            "email": "kamal@example.com",
            "status": "resolved",
            "triageNote": "ignore",
        });

        let draft = parse_draft::<Issue>(&raw).unwrap();
        let issue = Issue::create(Uuid::new_v4(), draft, &WriteContext::new("x"));
        assert_eq!(issue.status, IssueStatus::Open);
        assert!(issue.triage_note.is_none());
    }

    #[test]
    fn malformed_booking_id_is_validation_error() {
        let raw = json!({
            "title": "t",
            "description": "d",
            "email": "a@b.co",
            "bookingId": "not-a-uuid",
        });
        assert!(parse_draft::<Issue>(&raw).is_err());
    }
}
