use crate::core::errors::BudgetError;
use crate::infrastructure::storage::blob::BlobStore;
use crate::infrastructure::storage::collection::{self, Collections};
use crate::infrastructure::storage::{Collection, Document, SnapshotOrder, Storage, Subscription};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Local key-value backend: each collection lives in its own blob, read once
/// on open and rewritten in full on every change to that collection.
///
/// A change is only committed in memory (and pushed to subscribers) after the
/// blob write succeeded, so a failed write leaves the collection untouched.
pub struct LocalStorage<B: BlobStore> {
    blobs: Arc<B>,
    collections: Arc<Collections>,
}

impl<B: BlobStore> Clone for LocalStorage<B> {
    fn clone(&self) -> Self {
        LocalStorage {
            blobs: self.blobs.clone(),
            collections: self.collections.clone(),
        }
    }
}

impl<B: BlobStore> LocalStorage<B> {
    pub async fn open(blobs: B) -> Result<Self, BudgetError> {
        let expenses = Self::load(&blobs, Collection::Expenses).await?;
        let todo_items = Self::load(&blobs, Collection::TodoItems).await?;
        info!(
            "Loaded local storage: {} expenses, {} to-do items",
            expenses.len(),
            todo_items.len()
        );
        Ok(LocalStorage {
            blobs: Arc::new(blobs),
            collections: Arc::new(Collections::new(expenses, todo_items)),
        })
    }

    async fn load(blobs: &B, collection: Collection) -> Result<Vec<Document>, BudgetError> {
        match blobs.read(collection.name()).await? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    /// Applies `change` to a copy of the collection; persists and commits only
    /// when it reports a modification.
    async fn transact<T, F>(&self, collection: Collection, change: F) -> Result<T, BudgetError>
    where
        T: Send,
        F: FnOnce(&mut Vec<Document>) -> (T, bool) + Send,
    {
        let mut state = self.collections.get(collection).write().await;
        let mut docs = state.docs().to_vec();
        let (result, changed) = change(&mut docs);
        if changed {
            let blob = serde_json::to_string(&docs)?;
            self.blobs.write(collection.name(), &blob).await?;
            debug!("Persisted {} ({} records)", collection, docs.len());
            state.commit(docs);
        }
        Ok(result)
    }
}

#[async_trait]
impl<B: BlobStore + 'static> Storage for LocalStorage<B> {
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
        let doc = collection::new_document(fields);
        self.transact(collection, |docs| {
            docs.push(doc.clone());
            (doc, true)
        })
        .await
    }

    async fn write_batch(
        &self,
        collection: Collection,
        records: Vec<Map<String, Value>>,
    ) -> Result<Vec<Document>, BudgetError> {
        let written: Vec<Document> = records.into_iter().map(collection::new_document).collect();
        self.transact(collection, |docs| {
            docs.extend(written.iter().cloned());
            let changed = !written.is_empty();
            (written, changed)
        })
        .await
    }

    async fn seed_if_empty(
        &self,
        collection: Collection,
        records: Vec<Map<String, Value>>,
    ) -> Result<bool, BudgetError> {
        self.transact(collection, |docs| {
            if !docs.is_empty() || records.is_empty() {
                return (false, false);
            }
            docs.extend(records.into_iter().map(collection::new_document));
            (true, true)
        })
        .await
    }

    async fn delete_one(&self, collection: Collection, id: &str) -> Result<bool, BudgetError> {
        Ok(self.delete_batch(collection, &[id.to_string()]).await? > 0)
    }

    async fn delete_batch(&self, collection: Collection, ids: &[String]) -> Result<usize, BudgetError> {
        self.transact(collection, |docs| {
            let removed = collection::apply_delete(docs, ids);
            (removed, removed > 0)
        })
        .await
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        partial: Map<String, Value>,
    ) -> Result<Option<Document>, BudgetError> {
        self.transact(collection, |docs| {
            let updated = collection::apply_update(docs, id, partial);
            let changed = updated.is_some();
            (updated, changed)
        })
        .await
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
