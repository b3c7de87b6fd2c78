use crate::core::errors::BudgetError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Key-value storage of whole serialized blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, BudgetError>;
    async fn write(&self, key: &str, blob: &str) -> Result<(), BudgetError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBlobStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn read(&self, key: &str) -> Result<Option<String>, BudgetError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BudgetError::StorageError(format!("Failed to read {}: {}", key, e))),
        }
    }

    async fn write(&self, key: &str, blob: &str) -> Result<(), BudgetError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| BudgetError::StorageError(format!("Failed to create {}: {}", self.dir.display(), e)))?;
        // Write-then-rename so a crash never leaves a truncated blob behind.
        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        tokio::fs::write(&tmp, blob)
            .await
            .map_err(|e| BudgetError::StorageError(format!("Failed to write {}: {}", key, e)))?;
        tokio::fs::rename(&tmp, &target)
            .await
            .map_err(|e| BudgetError::StorageError(format!("Failed to replace {}: {}", key, e)))?;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn read(&self, key: &str) -> Result<Option<String>, BudgetError> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, blob: &str) -> Result<(), BudgetError> {
        self.blobs.write().await.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
