use crate::core::errors::BudgetError;
use crate::infrastructure::storage::collection::{self, Collections};
use crate::infrastructure::storage::{Collection, Document, SnapshotOrder, Storage, Subscription};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Realtime document store kept in process memory. Every committed change is
/// pushed to all live subscriptions of the affected collection.
#[derive(Clone)]
pub struct InMemoryStorage {
    collections: Arc<Collections>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            collections: Arc::new(Collections::new(Vec::new(), Vec::new())),
        }
    }
}

#[cfg(test)]
impl InMemoryStorage {
    pub(crate) async fn subscriber_count(&self, collection: Collection) -> usize {
        self.collections.get(collection).read().await.subscriber_count()
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn subscribe(&self, collection: Collection, order: SnapshotOrder) -> Result<Subscription, BudgetError> {
        let state = self.collections.get(collection).read().await;
        Ok(Subscription::new(collection, state.subscribe(), order))
    }

    async fn list(&self, collection: Collection, order: SnapshotOrder) -> Result<Vec<Document>, BudgetError> {
        let state = self.collections.get(collection).read().await;
        Ok(order.apply(state.docs().to_vec()))
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, BudgetError> {
        let state = self.collections.get(collection).read().await;
        Ok(collection::find(state.docs(), id))
    }

    async fn write_one(&self, collection: Collection, fields: Map<String, Value>) -> Result<Document, BudgetError> {
        let mut state = self.collections.get(collection).write().await;
        let doc = collection::new_document(fields);
        let mut docs = state.docs().to_vec();
        docs.push(doc.clone());
        state.commit(docs);
        Ok(doc)
    }

    async fn write_batch(
        &self,
        collection: Collection,
        records: Vec<Map<String, Value>>,
    ) -> Result<Vec<Document>, BudgetError> {
        let mut state = self.collections.get(collection).write().await;
        let written: Vec<Document> = records.into_iter().map(collection::new_document).collect();
        let mut docs = state.docs().to_vec();
        docs.extend(written.iter().cloned());
        state.commit(docs);
        Ok(written)
    }

    async fn seed_if_empty(
        &self,
        collection: Collection,
        records: Vec<Map<String, Value>>,
    ) -> Result<bool, BudgetError> {
        let mut state = self.collections.get(collection).write().await;
        if !state.docs().is_empty() || records.is_empty() {
            return Ok(false);
        }
        state.commit(records.into_iter().map(collection::new_document).collect());
        Ok(true)
    }

    async fn delete_one(&self, collection: Collection, id: &str) -> Result<bool, BudgetError> {
        Ok(self.delete_batch(collection, &[id.to_string()]).await? > 0)
    }

    async fn delete_batch(&self, collection: Collection, ids: &[String]) -> Result<usize, BudgetError> {
        let mut state = self.collections.get(collection).write().await;
        let mut docs = state.docs().to_vec();
        let removed = collection::apply_delete(&mut docs, ids);
        if removed > 0 {
            state.commit(docs);
        }
        Ok(removed)
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        partial: Map<String, Value>,
    ) -> Result<Option<Document>, BudgetError> {
        let mut state = self.collections.get(collection).write().await;
        let mut docs = state.docs().to_vec();
        let updated = collection::apply_update(&mut docs, id, partial);
        if updated.is_some() {
            state.commit(docs);
        }
        Ok(updated)
    }

    async fn query_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, BudgetError> {
        let state = self.collections.get(collection).read().await;
        Ok(collection::matching(state.docs(), field, value))
    }
}
