//! Persistence of clustering results.
//!
//! A [`ClusterStore`] encodes a [`ClusterSet`](crate::mining::ClusterSet)
//! into a self-describing document and hands the bytes to a
//! [`StorageBackend`]. Backends only move bytes around under a name and know
//! nothing about clusters.
//!
//! ```text
//! ClusterStore::save ──encode──▶ bytes ──▶ StorageBackend::write(name)
//! ClusterStore::load ◀──decode── bytes ◀── StorageBackend::read(name)
//! ```

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{QtError, Result};

pub mod codec;
pub mod filesystem;
pub mod in_memory;

pub use codec::{ClusterStore, FORMAT_VERSION};
pub use filesystem::FileSystemStorage;
pub use in_memory::InMemoryStorage;

/// File extension of persisted clustering artifacts.
pub const CLUSTERING_FILE_EXTENSION: &str = "qtc";

const MAX_NAME_LENGTH: usize = 128;

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").expect("Hard-coded regex pattern should be valid")
});

/// Checks that `name` can be used as an artifact key.
///
/// Names are 1 to 128 characters of letters, digits, `_`, `-` and `.`, and
/// may not start with a dot. This keeps them inside the storage root on any
/// filesystem.
pub fn validate_artifact_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(QtError::invalid_name(name, "name is empty"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(QtError::invalid_name(
            name,
            format!("name is longer than {MAX_NAME_LENGTH} characters"),
        ));
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(QtError::invalid_name(
            name,
            "only letters, digits, '_', '-' and '.' are allowed, and no leading '.'",
        ));
    }
    Ok(())
}

/// The file name an artifact called `name` is stored under.
pub fn artifact_file_name(name: &str) -> String {
    format!("{name}.{CLUSTERING_FILE_EXTENSION}")
}

/// Byte-level storage keyed by artifact name.
///
/// Implementations must report a missing artifact from [`read`](Self::read)
/// as [`QtError::Io`] with [`std::io::ErrorKind::NotFound`].
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Reads the bytes stored under `name`.
    async fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Stores `bytes` under `name`, replacing any previous content.
    async fn write(&self, name: &str, bytes: Vec<u8>) -> Result<()>;

    /// Returns whether an artifact is stored under `name`.
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Removes the artifact stored under `name`.
    async fn delete(&self, name: &str) -> Result<()>;

    /// Lists stored artifact names in ascending order.
    async fn list(&self) -> Result<Vec<String>>;

    /// Short identifier used in logs.
    fn backend_type(&self) -> &'static str;
}

pub(crate) fn not_found(name: &str) -> QtError {
    QtError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("no clustering stored under '{name}'"),
    ))
}
