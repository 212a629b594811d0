//! Spare parts and consumables held in stock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{amount, required, FieldError, Record, Validate, WriteContext};
use crate::security::projection::FieldSpec;
use crate::store::{Collection, Store};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub supplier: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_modified_by: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDraft {
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub supplier: String,
}

impl Validate for InventoryDraft {
    fn validate(&self) -> Result<(), FieldError> {
        required("name", &self.name)?;
        required("category", &self.category)?;
        amount("unitPrice", self.unit_price)?;
        required("supplier", &self.supplier)
    }
}

impl Record for InventoryItem {
    type Draft = InventoryDraft;

    const LABEL: &'static str = "Inventory item";

    const INPUT: FieldSpec = FieldSpec::new(
        "inventory.input",
        &["name", "category", "quantity", "unitPrice", "supplier"],
    );

    const PUBLIC: FieldSpec = FieldSpec::new(
        "inventory.public",
        &[
            "id",
            "name",
            "category",
            "quantity",
            "unitPrice",
            "supplier",
            "createdAt",
            "updatedAt",
        ],
    );

    fn id(&self) -> Uuid {
        self.id
    }

    fn create(id: Uuid, draft: InventoryDraft, ctx: &WriteContext) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            supplier: draft.supplier,
            created_at: ctx.now,
            updated_at: ctx.now,
            last_modified_by: ctx.client.clone(),
        }
    }

    fn apply(&mut self, draft: InventoryDraft, ctx: &WriteContext) {
        self.name = draft.name;
        self.category = draft.category;
        self.quantity = draft.quantity;
        self.unit_price = draft.unit_price;
        self.supplier = draft.supplier;
        self.updated_at = ctx.now;
        self.last_modified_by = ctx.client.clone();
    }

    fn collection(store: &Store) -> &Collection<Self> {
        &store.inventory
    }
}

/// Sum of `quantity` across every item.
pub fn total_units(items: &[InventoryItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}
