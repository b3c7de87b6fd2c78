pub mod blob;
pub(crate) mod collection;
pub mod in_memory;
pub mod local;

use crate::core::errors::BudgetError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;

/// Named collections the budget keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Expenses,
    TodoItems,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Expenses, Collection::TodoItems];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Expenses => "expenses",
            Collection::TodoItems => "todo_items",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A schemaless record. `id` and `created_at` are assigned by the adapter on write.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub fields: Map<String, Value>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapshotOrder {
    #[default]
    CreatedAtDesc,
    CreatedAtAsc,
}

impl SnapshotOrder {
    pub fn apply(&self, mut docs: Vec<Document>) -> Vec<Document> {
        match self {
            SnapshotOrder::CreatedAtDesc => docs.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SnapshotOrder::CreatedAtAsc => docs.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
        docs
    }
}

/// Live view of one collection.
///
/// The first call to [`Subscription::next`] resolves immediately with the
/// current contents; every later call waits for the next committed change.
/// Dropping the subscription (or calling [`Subscription::unsubscribe`]) stops
/// delivery.
pub struct Subscription {
    collection: Collection,
    receiver: watch::Receiver<Vec<Document>>,
    order: SnapshotOrder,
    primed: bool,
}

impl Subscription {
    pub(crate) fn new(
        collection: Collection,
        receiver: watch::Receiver<Vec<Document>>,
        order: SnapshotOrder,
    ) -> Self {
        Subscription {
            collection,
            receiver,
            order,
            primed: false,
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// `None` once the backing store has gone away.
    pub async fn next(&mut self) -> Option<Vec<Document>> {
        if self.primed {
            self.receiver.changed().await.ok()?;
        }
        self.primed = true;
        let snapshot = self.receiver.borrow_and_update().clone();
        Some(self.order.apply(snapshot))
    }

    /// Consumes the subscription. Dropping the `watch::Receiver` is what stops
    /// delivery; plain `drop` has the same effect.
    pub fn unsubscribe(self) {
        tracing::debug!("Unsubscribed from {}", self.collection);
    }
}

/// Persistence adapter. The single source of truth for both collections.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn subscribe(&self, collection: Collection, order: SnapshotOrder) -> Result<Subscription, BudgetError>;
    async fn list(&self, collection: Collection, order: SnapshotOrder) -> Result<Vec<Document>, BudgetError>;
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, BudgetError>;
    async fn write_one(&self, collection: Collection, fields: Map<String, Value>) -> Result<Document, BudgetError>;
    /// All records are written or none are.
    async fn write_batch(
        &self,
        collection: Collection,
        records: Vec<Map<String, Value>>,
    ) -> Result<Vec<Document>, BudgetError>;
    /// Emptiness check and batch write under one exclusive lock. Returns whether anything was written.
    async fn seed_if_empty(&self, collection: Collection, records: Vec<Map<String, Value>>)
    -> Result<bool, BudgetError>;
    /// Returns whether a document was removed; a missing id is not an error.
    async fn delete_one(&self, collection: Collection, id: &str) -> Result<bool, BudgetError>;
    /// All ids are removed or none are. Returns the number removed.
    async fn delete_batch(&self, collection: Collection, ids: &[String]) -> Result<usize, BudgetError>;
    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        partial: Map<String, Value>,
    ) -> Result<Option<Document>, BudgetError>;
    async fn query_by_field(&self, collection: Collection, field: &str, value: &Value)
    -> Result<Vec<Document>, BudgetError>;
}

/// Lets a backend chosen at startup be shared as `Arc<dyn Storage>`.
#[async_trait]
impl<T: Storage + ?Sized> Storage for Arc<T> {
    async fn subscribe(&self, collection: Collection, order: SnapshotOrder) -> Result<Subscription, BudgetError> {
        (**self).subscribe(collection, order).await
    }

    async fn list(&self, collection: Collection, order: SnapshotOrder) -> Result<Vec<Document>, BudgetError> {
        (**self).list(collection, order).await
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, BudgetError> {
        (**self).get(collection, id).await
    }

    async fn write_one(&self, collection: Collection, fields: Map<String, Value>) -> Result<Document, BudgetError> {
        (**self).write_one(collection, fields).await
    }

    async fn write_batch(
        &self,
        collection: Collection,
        records: Vec<Map<String, Value>>,
    ) -> Result<Vec<Document>, BudgetError> {
        (**self).write_batch(collection, records).await
    }

    async fn seed_if_empty(
        &self,
        collection: Collection,
        records: Vec<Map<String, Value>>,
    ) -> Result<bool, BudgetError> {
        (**self).seed_if_empty(collection, records).await
    }

    async fn delete_one(&self, collection: Collection, id: &str) -> Result<bool, BudgetError> {
        (**self).delete_one(collection, id).await
    }

    async fn delete_batch(&self, collection: Collection, ids: &[String]) -> Result<usize, BudgetError> {
        (**self).delete_batch(collection, ids).await
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        partial: Map<String, Value>,
    ) -> Result<Option<Document>, BudgetError> {
        (**self).update_one(collection, id, partial).await
    }

    async fn query_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, BudgetError> {
        (**self).query_by_field(collection, field, value).await
    }
}
