//! Slot storage abstraction
//!
//! A slot is a named, durable key-value entry holding one serialized
//! collection. The filesystem backend keeps one `<slot>.json` file per slot.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info};
use vibemail_common::config::StorageConfig;
use vibemail_common::{Error, Result};

/// Slot storage trait
#[async_trait]
pub trait SlotStorage: Send + Sync {
    /// Replace the contents of a slot
    async fn write(&self, slot: &str, data: &[u8]) -> Result<()>;

    /// Read a slot, `None` when it was never written
    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>>;

    /// Remove a slot
    async fn delete(&self, slot: &str) -> Result<()>;

    /// Check if a slot exists
    async fn exists(&self, slot: &str) -> Result<bool> {
        Ok(self.read(slot).await?.is_some())
    }

    /// Probe the backend
    async fn health_check(&self) -> Result<()>;
}

/// Reject slot names that could escape the storage root
fn validate_slot(slot: &str) -> Result<()> {
    if slot.is_empty() {
        return Err(Error::Storage("Slot name must not be empty".to_string()));
    }
    if slot.contains("..") {
        return Err(Error::Storage(
            "Path traversal detected: '..' is not allowed".to_string(),
        ));
    }
    if slot.starts_with('/') || slot.starts_with('\\') {
        return Err(Error::Storage("Absolute paths are not allowed".to_string()));
    }
    if !slot
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::Storage(format!("Invalid slot name: {}", slot)));
    }
    Ok(())
}

/// Local filesystem storage
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage instance from config
    pub fn new(config: &StorageConfig) -> Result<Self> {
        Self::from_path(&config.path)
    }

    /// Create a new local storage instance from a path
    pub fn from_path(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .map_err(|e| Error::Storage(format!("Failed to create storage directory: {}", e)))?;

        info!(path = %path.display(), "Initialized local slot storage");

        Ok(Self {
            base_path: path.to_path_buf(),
        })
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        validate_slot(slot)?;
        Ok(self.base_path.join(format!("{}.json", slot)))
    }
}

#[async_trait]
impl SlotStorage for LocalStorage {
    async fn write(&self, slot: &str, data: &[u8]) -> Result<()> {
        let path = self.slot_path(slot)?;
        let tmp_path = self.base_path.join(format!(".{}.json.tmp", slot));

        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| Error::Storage(format!("Failed to create file: {}", e)))?;
        file.write_all(data)
            .await
            .map_err(|e| Error::Storage(format!("Failed to write file: {}", e)))?;
        file.sync_all()
            .await
            .map_err(|e| Error::Storage(format!("Failed to sync file: {}", e)))?;
        drop(file);

        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| Error::Storage(format!("Failed to replace slot file: {}", e)))?;

        debug!(slot = %slot, size = data.len(), "Wrote slot");
        Ok(())
    }

    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        let path = self.slot_path(slot)?;

        match fs::read(&path).await {
            Ok(data) => {
                debug!(slot = %slot, size = data.len(), "Read slot");
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!("Failed to read file: {}", e))),
        }
    }

    async fn delete(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(slot = %slot, "Deleted slot");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!("Failed to delete file: {}", e))),
        }
    }

    async fn exists(&self, slot: &str) -> Result<bool> {
        let path = self.slot_path(slot)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn health_check(&self) -> Result<()> {
        let metadata = fs::metadata(&self.base_path)
            .await
            .map_err(|e| Error::Storage(format!("Storage directory unavailable: {}", e)))?;
        if !metadata.is_dir() {
            return Err(Error::Storage(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStorage for MemoryStorage {
    async fn write(&self, slot: &str, data: &[u8]) -> Result<()> {
        validate_slot(slot)?;
        self.slots
            .write()
            .await
            .insert(slot.to_string(), data.to_vec());
        Ok(())
    }

    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        validate_slot(slot)?;
        Ok(self.slots.read().await.get(slot).cloned())
    }

    async fn delete(&self, slot: &str) -> Result<()> {
        validate_slot(slot)?;
        self.slots.write().await.remove(slot);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Create slot storage from configuration
pub fn create_storage(config: &StorageConfig) -> Result<Box<dyn SlotStorage>> {
    match config.backend.as_str() {
        "fs" => Ok(Box::new(LocalStorage::new(config)?)),
        "memory" => Ok(Box::new(MemoryStorage::new())),
        other => Err(Error::Config(format!(
            "Unsupported storage backend: {}",
            other
        ))),
    }
}
