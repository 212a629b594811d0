//! Workshop staff.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{amount, email, required, FieldError, Record, Validate, WriteContext};
use crate::security::projection::FieldSpec;
use crate::store::{Collection, Store};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub basic_salary: f64,
    pub joined_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub source_address: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub basic_salary: f64,
    pub joined_on: NaiveDate,
}

impl Validate for EmployeeDraft {
    fn validate(&self) -> Result<(), FieldError> {
        required("name", &self.name)?;
        email("email", &self.email)?;
        required("phone", &self.phone)?;
        required("role", &self.role)?;
        amount("basicSalary", self.basic_salary)
    }
}

impl Record for Employee {
    type Draft = EmployeeDraft;

    const LABEL: &'static str = "Employee";

    const INPUT: FieldSpec = FieldSpec::new(
        "employee.input",
        &["name", "email", "phone", "role", "basicSalary", "joinedOn"],
    );

    const PUBLIC: FieldSpec = FieldSpec::new(
        "employee.public",
        &[
            "id",
            "name",
            "email",
            "phone",
            "role",
            "basicSalary",
            "joinedOn",
            "createdAt",
            "updatedAt",
        ],
    );

    fn id(&self) -> Uuid {
        self.id
    }

    fn create(id: Uuid, draft: EmployeeDraft, ctx: &WriteContext) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            role: draft.role,
            basic_salary: draft.basic_salary,
            joined_on: draft.joined_on,
            created_at: ctx.now,
            updated_at: ctx.now,
            source_address: ctx.client.clone(),
        }
    }

    fn apply(&mut self, draft: EmployeeDraft, ctx: &WriteContext) {
        self.name = draft.name;
        self.email = draft.email;
        self.phone = draft.phone;
        self.role = draft.role;
        self.basic_salary = draft.basic_salary;
        self.joined_on = draft.joined_on;
        self.updated_at = ctx.now;
    }

    fn collection(store: &Store) -> &Collection<Self> {
        &store.employees
    }
}
