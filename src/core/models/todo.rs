use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::core::errors::BudgetError;
use crate::core::models::expense::into_object;
use crate::infrastructure::storage::Document;

/// A planned purchase on the shopping list.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToDoItem {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct ToDoFields {
    text: String,
}

impl ToDoItem {
    pub fn from_document(doc: &Document) -> Result<Self, BudgetError> {
        let fields: ToDoFields = serde_json::from_value(Value::Object(doc.fields.clone()))?;
        Ok(ToDoItem {
            id: doc.id.clone(),
            text: fields.text,
            created_at: doc.created_at,
        })
    }

    pub fn fields_for(text: &str) -> Result<Map<String, Value>, BudgetError> {
        into_object(serde_json::to_value(ToDoFields { text: text.to_string() })?)
    }
}
