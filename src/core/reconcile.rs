//! Removes shopping-list entries once a matching expense is recorded.
//!
//! This is a one-shot trigger at expense creation. Edits to an expense never
//! re-run it, and a removed entry is never restored.

use crate::core::errors::BudgetError;
use crate::core::models::{Expense, ToDoItem, decode_todo_items};
use crate::infrastructure::storage::{Collection, SnapshotOrder, Storage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;
use utoipa::ToSchema;

/// How a to-do `text` is compared against an expense `description`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Byte-for-byte equality.
    #[default]
    Exact,
    /// Equal after trimming whitespace and ignoring case.
    Normalized,
}

impl MatchPolicy {
    pub fn matches(&self, text: &str, description: &str) -> bool {
        match self {
            MatchPolicy::Exact => text == description,
            MatchPolicy::Normalized => text.trim().to_lowercase() == description.trim().to_lowercase(),
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchPolicy::Exact),
            "normalized" | "normalised" => Ok(MatchPolicy::Normalized),
            other => Err(format!("unknown match policy `{}`", other)),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, ToSchema, PartialEq)]
pub struct ReconcileOutcome {
    pub removed: Vec<ToDoItem>,
}

impl ReconcileOutcome {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Every item whose text satisfies `predicate(text, description)`.
pub fn find_matches_by<'a, P>(items: &'a [ToDoItem], description: &str, predicate: P) -> Vec<&'a ToDoItem>
where
    P: Fn(&str, &str) -> bool,
{
    items.iter().filter(|item| predicate(&item.text, description)).collect()
}

pub fn find_matches<'a>(items: &'a [ToDoItem], description: &str, policy: MatchPolicy) -> Vec<&'a ToDoItem> {
    find_matches_by(items, description, |text, description| policy.matches(text, description))
}

/// Deletes all to-do items matching `expense` in one all-or-nothing batch.
///
/// Reads whatever to-do state the store holds right now; concurrent edits by
/// other clients are not coordinated with this scan.
pub async fn reconcile<S>(storage: &S, expense: &Expense, policy: MatchPolicy) -> Result<ReconcileOutcome, BudgetError>
where
    S: Storage + ?Sized,
{
    let docs = match policy {
        MatchPolicy::Exact => {
            storage
                .query_by_field(
                    Collection::TodoItems,
                    "text",
                    &Value::String(expense.description.clone()),
                )
                .await?
        }
        MatchPolicy::Normalized => storage.list(Collection::TodoItems, SnapshotOrder::default()).await?,
    };

    let items = decode_todo_items(&docs);

    let removed: Vec<ToDoItem> = find_matches(&items, &expense.description, policy)
        .into_iter()
        .cloned()
        .collect();
    if removed.is_empty() {
        debug!("No to-do item matches '{}'", expense.description);
        return Ok(ReconcileOutcome::default());
    }

    let ids: Vec<String> = removed.iter().map(|item| item.id.clone()).collect();
    storage.delete_batch(Collection::TodoItems, &ids).await?;
    debug!("Removed {} to-do item(s) matching '{}'", ids.len(), expense.description);
    Ok(ReconcileOutcome { removed })
}
