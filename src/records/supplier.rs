//! Parts suppliers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{email, required, FieldError, Record, Validate, WriteContext};
use crate::security::projection::FieldSpec;
use crate::store::{Collection, Store};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub items: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub source_address: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDraft {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl Validate for SupplierDraft {
    fn validate(&self) -> Result<(), FieldError> {
        required("name", &self.name)?;
        required("company", &self.company)?;
        email("email", &self.email)?;
        required("phone", &self.phone)?;
        if self.items.iter().any(|item| item.trim().is_empty()) {
            return Err(FieldError {
                field: "items",
                reason: "must not contain empty entries",
            });
        }
        Ok(())
    }
}

impl Record for Supplier {
    type Draft = SupplierDraft;

    const LABEL: &'static str = "Supplier";

    const INPUT: FieldSpec =
        FieldSpec::new("supplier.input", &["name", "company", "email", "phone", "items"]);

    const PUBLIC: FieldSpec = FieldSpec::new(
        "supplier.public",
        &[
            "id",
            "name",
            "company",
            "email",
            "phone",
            "items",
            "createdAt",
            "updatedAt",
        ],
    );

    fn id(&self) -> Uuid {
        self.id
    }

    fn create(id: Uuid, draft: SupplierDraft, ctx: &WriteContext) -> Self {
        Self {
            id,
            name: draft.name,
            company: draft.company,
            email: draft.email,
            phone: draft.phone,
            items: draft.items,
            created_at: ctx.now,
            updated_at: ctx.now,
            source_address: ctx.client.clone(),
        }
    }

    fn apply(&mut self, draft: SupplierDraft, ctx: &WriteContext) {
        self.name = draft.name;
        self.company = draft.company;
        self.email = draft.email;
        self.phone = draft.phone;
        self.items = draft.items;
        self.updated_at = ctx.now;
    }

    fn collection(store: &Store) -> &Collection<Self> {
        &store.suppliers
    }
}
