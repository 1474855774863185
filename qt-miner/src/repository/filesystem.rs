//! File system storage backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, instrument};

use super::{artifact_file_name, not_found, validate_artifact_name, StorageBackend};
use super::CLUSTERING_FILE_EXTENSION;
use crate::error::{QtError, Result};

/// Stores each artifact as one file under a base directory:
///
/// ```text
/// base_path/
/// ├── weather.qtc
/// └── weather_2024-01-15.qtc
/// ```
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a half-written artifact.
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    base_path: PathBuf,
}

impl FileSystemStorage {
    /// Creates a storage rooted at `base_path`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file holding the artifact called `name`.
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.base_path.join(artifact_file_name(name))
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!(".{}.tmp", artifact_file_name(name)))
    }
}

#[async_trait]
impl StorageBackend for FileSystemStorage {
    #[instrument(skip(self))]
    async fn read(&self, name: &str) -> Result<Vec<u8>> {
        validate_artifact_name(name)?;
        match fs::read(self.artifact_path(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found(name)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    async fn write(&self, name: &str, bytes: Vec<u8>) -> Result<()> {
        validate_artifact_name(name)?;
        let target = self.artifact_path(name);
        let temp = self.temp_path(name);

        fs::create_dir_all(&self.base_path).await?;
        fs::write(&temp, bytes).await?;
        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        debug!(path = %target.display(), "Wrote artifact");
        Ok(())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        validate_artifact_name(name)?;
        Ok(fs::try_exists(self.artifact_path(name)).await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> Result<()> {
        validate_artifact_name(name)?;
        match fs::remove_file(self.artifact_path(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found(name)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<String>> {
        let pattern = format!(
            "{}/*.{CLUSTERING_FILE_EXTENSION}",
            glob::Pattern::escape(&self.base_path.to_string_lossy())
        );
        let paths = glob::glob(&pattern)
            .map_err(|e| QtError::invalid_data(format!("Invalid storage pattern: {e}")))?;

        let mut names = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| QtError::Io(e.into_error()))?;
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_artifact_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn backend_type(&self) -> &'static str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(dir.path()).unwrap();

        storage.write("weather", b"payload".to_vec()).await.unwrap();
        assert!(dir.path().join("weather.qtc").exists());
        assert_eq!(storage.read("weather").await.unwrap(), b"payload");
        assert!(storage.exists("weather").await.unwrap());

        storage.write("weather", b"new".to_vec()).await.unwrap();
        assert_eq!(storage.read("weather").await.unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(dir.path()).unwrap();
        assert!(storage.read("absent").await.unwrap_err().is_not_found());
        assert!(storage.delete("absent").await.unwrap_err().is_not_found());
        assert!(!storage.exists("absent").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_only_artifacts() {
        let dir = TempDir::new().unwrap();
        let storage = FileSystemStorage::new(dir.path()).unwrap();
        storage.write("b", vec![1]).await.unwrap();
        storage.write("a.v2", vec![2]).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(storage.list().await.unwrap(), vec!["a.v2", "b"]);

        storage.delete("b").await.unwrap();
        assert_eq!(storage.list().await.unwrap(), vec!["a.v2"]);
    }

    #[tokio::test]
    async fn test_creates_nested_base_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("runs").join("2024");
        let storage = FileSystemStorage::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert!(storage.list().await.unwrap().is_empty());
        assert_eq!(storage.base_path(), nested.as_path());
        assert_eq!(storage.backend_type(), "filesystem");
    }
}
