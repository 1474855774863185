//! In-memory storage backend for tests and short-lived sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

use super::{not_found, validate_artifact_name, StorageBackend};
use crate::error::Result;

/// Keeps artifacts in a shared map.
///
/// Clones share the same map, so a store handed to several sessions sees
/// every write.
///
/// # Example
///
/// ```rust
/// use qt_miner::repository::{InMemoryStorage, StorageBackend};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> qt_miner::error::Result<()> {
/// let storage = InMemoryStorage::new();
/// storage.write("run1", b"{}".to_vec()).await?;
/// assert!(storage.exists("run1").await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    artifacts: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    pub async fn size(&self) -> usize {
        self.artifacts.read().await.len()
    }

    pub async fn clear(&self) {
        self.artifacts.write().await.clear();
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    #[instrument(skip(self))]
    async fn read(&self, name: &str) -> Result<Vec<u8>> {
        validate_artifact_name(name)?;
        self.artifacts
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    async fn write(&self, name: &str, bytes: Vec<u8>) -> Result<()> {
        validate_artifact_name(name)?;
        self.artifacts.write().await.insert(name.to_string(), bytes);
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        validate_artifact_name(name)?;
        Ok(self.artifacts.read().await.contains_key(name))
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> Result<()> {
        validate_artifact_name(name)?;
        self.artifacts
            .write()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(name))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.artifacts.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn backend_type(&self) -> &'static str {
        "in_memory"
    }
}
