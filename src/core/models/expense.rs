use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::core::errors::BudgetError;
use crate::infrastructure::storage::Document;

/// A recorded outlay against the budget.
///
/// `id` and `created_at` come from the persistence adapter and never change
/// after creation. Fixed expenses are structural costs (a mortgage, own
/// funds) and are neither editable nor deletable.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub is_fixed: bool,
    pub created_at: DateTime<Utc>,
}

/// Stored shape of an expense document, without the adapter-owned metadata.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub is_fixed: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ExpenseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
}

impl NewExpense {
    pub fn new(description: impl Into<String>, amount: Decimal, is_fixed: bool) -> Self {
        NewExpense {
            description: description.into(),
            amount,
            is_fixed,
        }
    }

    pub fn to_fields(&self) -> Result<Map<String, Value>, BudgetError> {
        into_object(serde_json::to_value(self)?)
    }
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none()
    }

    /// Only the fields that are present; `isFixed` and `id` can never be part of an update.
    pub fn to_fields(&self) -> Result<Map<String, Value>, BudgetError> {
        into_object(serde_json::to_value(self)?)
    }
}

impl Expense {
    pub fn from_document(doc: &Document) -> Result<Self, BudgetError> {
        let fields: NewExpense = serde_json::from_value(Value::Object(doc.fields.clone()))?;
        Ok(Expense {
            id: doc.id.clone(),
            description: fields.description,
            amount: fields.amount,
            is_fixed: fields.is_fixed,
            created_at: doc.created_at,
        })
    }
}

pub(crate) fn into_object(value: Value) -> Result<Map<String, Value>, BudgetError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(BudgetError::Serialization(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}
