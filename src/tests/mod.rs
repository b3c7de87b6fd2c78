mod api_tests;
mod export_tests;

use crate::core::errors::BudgetError;
use crate::core::services::{BudgetService, BudgetSettings};
use crate::infrastructure::notifications::in_memory::InMemoryNotifications;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use crate::infrastructure::storage::{Collection, Document, SnapshotOrder, Storage, Subscription};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub fn create_test_service() -> BudgetService<InMemoryNotifications, InMemoryStorage> {
    create_test_service_with(BudgetSettings::default())
}

pub fn create_test_service_with(settings: BudgetSettings) -> BudgetService<InMemoryNotifications, InMemoryStorage> {
    BudgetService::new(InMemoryStorage::new(), InMemoryNotifications::new(), settings)
}

/// Service over a store that can be told to fail chosen operations.
pub fn create_flaky_service() -> (BudgetService<InMemoryNotifications, FlakyStorage>, FlakyStorage) {
    let storage = FlakyStorage::new();
    let service = BudgetService::new(
        storage.clone(),
        InMemoryNotifications::new(),
        BudgetSettings::default(),
    );
    (service, storage)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Write,
    Delete,
    Update,
    Read,
}

/// Delegates to an in-memory store unless `(op, collection)` was marked as failing.
#[derive(Clone, Default)]
pub struct FlakyStorage {
    inner: InMemoryStorage,
    failing: Arc<Mutex<HashSet<(Op, Collection)>>>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryStorage {
        &self.inner
    }

    pub fn fail(&self, op: Op, collection: Collection) {
        self.failing.lock().unwrap().insert((op, collection));
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    fn check(&self, op: Op, collection: Collection) -> Result<(), BudgetError> {
        if self.failing.lock().unwrap().contains(&(op, collection)) {
            return Err(BudgetError::StorageError(format!("{:?} on {} rejected", op, collection)));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn subscribe(&self, collection: Collection, order: SnapshotOrder) -> Result<Subscription, BudgetError> {
        self.inner.subscribe(collection, order).await
    }

    async fn list(&self, collection: Collection, order: SnapshotOrder) -> Result<Vec<Document>, BudgetError> {
        self.check(Op::Read, collection)?;
        self.inner.list(collection, order).await
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, BudgetError> {
        self.check(Op::Read, collection)?;
        self.inner.get(collection, id).await
    }

    async fn write_one(&self, collection: Collection, fields: Map<String, Value>) -> Result<Document, BudgetError> {
        self.check(Op::Write, collection)?;
        self.inner.write_one(collection, fields).await
    }

    async fn write_batch(
        &self,
        collection: Collection,
        records: Vec<Map<String, Value>>,
    ) -> Result<Vec<Document>, BudgetError> {
        self.check(Op::Write, collection)?;
        self.inner.write_batch(collection, records).await
    }

    async fn seed_if_empty(
        &self,
        collection: Collection,
        records: Vec<Map<String, Value>>,
    ) -> Result<bool, BudgetError> {
        self.check(Op::Write, collection)?;
        self.inner.seed_if_empty(collection, records).await
    }

    async fn delete_one(&self, collection: Collection, id: &str) -> Result<bool, BudgetError> {
        self.check(Op::Delete, collection)?;
        self.inner.delete_one(collection, id).await
    }

    async fn delete_batch(&self, collection: Collection, ids: &[String]) -> Result<usize, BudgetError> {
        self.check(Op::Delete, collection)?;
        self.inner.delete_batch(collection, ids).await
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        partial: Map<String, Value>,
    ) -> Result<Option<Document>, BudgetError> {
        self.check(Op::Update, collection)?;
        self.inner.update_one(collection, id, partial).await
    }

    async fn query_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, BudgetError> {
        self.check(Op::Read, collection)?;
        self.inner.query_by_field(collection, field, value).await
    }
}
