//! Collection stores
//!
//! Each store owns one ordered collection and mirrors it to a slot. Writers
//! replace the whole collection; every successful write bumps the snapshot
//! revision. The slot is written before the in-memory swap, so a failed write
//! leaves both sides untouched.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::{debug, info, warn};
use vibemail_common::{Error, Result};

use crate::codec;
use crate::file::SlotStorage;

/// Immutable view of a collection at one revision
#[derive(Debug)]
pub struct Snapshot<T> {
    pub revision: u64,
    pub items: Arc<Vec<T>>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            revision: self.revision,
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Snapshot<T> {
    fn initial(items: Vec<T>) -> Self {
        Self {
            revision: 0,
            items: Arc::new(items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

/// Outcome of a read-modify-write closure
pub enum Update<T, R> {
    /// Leave the collection as it is
    Keep(R),
    /// Replace the collection
    Replace(Vec<T>, R),
}

/// Store for one persisted collection
pub struct CollectionStore<T> {
    slot: String,
    storage: Arc<dyn SlotStorage>,
    state: RwLock<Snapshot<T>>,
}

impl<T> CollectionStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Open a store, loading its slot or falling back to `seed`.
    ///
    /// A missing slot is initialized with the seed. A payload that fails
    /// validation is logged and replaced by the seed in memory; the slot is
    /// overwritten on the next write. Legacy untagged payloads are rewritten
    /// in the current format.
    pub async fn open<F>(slot: &str, storage: Arc<dyn SlotStorage>, seed: F) -> Result<Self>
    where
        F: FnOnce() -> Vec<T>,
    {
        let items = match storage.read(slot).await {
            Ok(Some(bytes)) => match codec::decode::<T>(&bytes) {
                Ok(decoded) => {
                    if decoded.needs_migration() {
                        info!(
                            slot = %slot,
                            from_version = decoded.version,
                            "Migrating slot to current payload version"
                        );
                        let bytes = codec::encode(&decoded.items, Utc::now())?;
                        storage.write(slot, &bytes).await?;
                    }
                    debug!(slot = %slot, count = decoded.items.len(), "Loaded slot");
                    decoded.items
                }
                Err(e) => {
                    warn!(slot = %slot, error = %e, "Rejected stored payload, using seed data");
                    seed()
                }
            },
            Ok(None) => {
                let items = seed();
                let bytes = codec::encode(&items, Utc::now())?;
                storage.write(slot, &bytes).await?;
                info!(slot = %slot, count = items.len(), "Initialized slot with seed data");
                items
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            slot: slot.to_string(),
            storage,
            state: RwLock::new(Snapshot::initial(items)),
        })
    }

    /// Slot this store mirrors to
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Current snapshot
    pub async fn get_all(&self) -> Snapshot<T> {
        self.state.read().await.clone()
    }

    /// Replace the whole collection
    pub async fn replace_all(&self, items: Vec<T>) -> Result<Snapshot<T>> {
        let mut guard = self.lock().await;
        guard.commit(items).await
    }

    /// Replace the collection only if it is still at `expected_revision`
    pub async fn replace_if(&self, expected_revision: u64, items: Vec<T>) -> Result<Snapshot<T>> {
        let mut guard = self.lock().await;
        if guard.revision() != expected_revision {
            return Err(Error::Conflict(format!(
                "{} changed (revision {} != {})",
                self.slot,
                guard.revision(),
                expected_revision
            )));
        }
        guard.commit(items).await
    }

    /// Read-modify-write under the store's write lock
    pub async fn update<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&[T]) -> Result<Update<T, R>>,
    {
        let mut guard = self.lock().await;
        match f(guard.items())? {
            Update::Keep(output) => Ok(output),
            Update::Replace(items, output) => {
                guard.commit(items).await?;
                Ok(output)
            }
        }
    }

    /// Take the write lock for a multi-step commit
    pub async fn lock(&self) -> StoreGuard<'_, T> {
        StoreGuard {
            slot: &self.slot,
            storage: &self.storage,
            guard: self.state.write().await,
        }
    }
}

/// Exclusive access to a store's collection
pub struct StoreGuard<'a, T> {
    slot: &'a str,
    storage: &'a Arc<dyn SlotStorage>,
    guard: RwLockWriteGuard<'a, Snapshot<T>>,
}

impl<'a, T> StoreGuard<'a, T>
where
    T: Serialize + Send + Sync,
{
    pub fn items(&self) -> &[T] {
        &self.guard.items
    }

    pub fn revision(&self) -> u64 {
        self.guard.revision
    }

    /// Write `items` to the slot and swap them in
    pub async fn commit(&mut self, items: Vec<T>) -> Result<Snapshot<T>> {
        let bytes = self.encode(&items)?;
        self.persist(&bytes).await?;
        Ok(self.swap(items))
    }

    pub(crate) fn encode(&self, items: &[T]) -> Result<Vec<u8>> {
        codec::encode(items, Utc::now())
    }

    pub(crate) async fn persist(&self, bytes: &[u8]) -> Result<()> {
        self.storage.write(self.slot, bytes).await
    }

    pub(crate) fn swap(&mut self, items: Vec<T>) -> Snapshot<T> {
        *self.guard = Snapshot {
            revision: self.guard.revision + 1,
            items: Arc::new(items),
        };
        debug!(slot = %self.slot, revision = self.guard.revision, "Committed collection");
        self.guard.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::MemoryStorage;
    use crate::models::EmailAccount;
    use crate::seed;
    use pretty_assertions::assert_eq;

    const SLOT: &str = "vibemail_accounts";

    async fn open_store(storage: Arc<dyn SlotStorage>) -> CollectionStore<EmailAccount> {
        CollectionStore::open(SLOT, storage, seed::accounts).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_slot_is_seeded_and_persisted() {
        let storage: Arc<dyn SlotStorage> = Arc::new(MemoryStorage::new());
        let store = open_store(storage.clone()).await;

        let snapshot = store.get_all().await;
        assert_eq!(snapshot.revision, 0);
        assert_eq!(*snapshot.items, seed::accounts());
        assert!(storage.exists(SLOT).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_all_persists_and_reloads() {
        let storage: Arc<dyn SlotStorage> = Arc::new(MemoryStorage::new());
        let store = open_store(storage.clone()).await;

        let mut accounts = seed::accounts();
        accounts[0].sent_today = 30;
        accounts[0].quota_date = Some(Utc::now().date_naive());
        let snapshot = store.replace_all(accounts.clone()).await.unwrap();
        assert_eq!(snapshot.revision, 1);

        let reopened = open_store(storage).await;
        assert_eq!(*reopened.get_all().await.items, accounts);
    }

    #[tokio::test]
    async fn test_replace_if_detects_stale_revision() {
        let storage: Arc<dyn SlotStorage> = Arc::new(MemoryStorage::new());
        let store = open_store(storage).await;

        let base = store.get_all().await;
        store.replace_all(Vec::new()).await.unwrap();

        let err = store
            .replace_if(base.revision, seed::accounts())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert!(store.get_all().await.is_empty());

        let current = store.get_all().await;
        store.replace_if(current.revision, seed::accounts()).await.unwrap();
        assert_eq!(store.get_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_keep_skips_write() {
        let storage: Arc<dyn SlotStorage> = Arc::new(MemoryStorage::new());
        let store = open_store(storage).await;

        let count = store
            .update(|items| Ok(Update::Keep(items.len())))
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(store.get_all().await.revision, 0);

        store
            .update(|items| {
                let mut next = items.to_vec();
                next[0].warmup_enabled = false;
                Ok(Update::Replace(next, ()))
            })
            .await
            .unwrap();
        let snapshot = store.get_all().await;
        assert_eq!(snapshot.revision, 1);
        assert!(!snapshot.items[0].warmup_enabled);
    }

    #[tokio::test]
    async fn test_corrupt_slot_falls_back_to_seed() {
        let storage: Arc<dyn SlotStorage> = Arc::new(MemoryStorage::new());
        storage.write(SLOT, b"{\"version\": 1, \"data\": 5}").await.unwrap();

        let store = open_store(storage.clone()).await;
        assert_eq!(*store.get_all().await.items, seed::accounts());
        // left in place until the next write
        assert_eq!(
            storage.read(SLOT).await.unwrap().as_deref(),
            Some(&b"{\"version\": 1, \"data\": 5}"[..])
        );
    }

    #[tokio::test]
    async fn test_legacy_slot_is_migrated() {
        let storage: Arc<dyn SlotStorage> = Arc::new(MemoryStorage::new());
        let legacy = serde_json::to_vec(&seed::accounts()).unwrap();
        storage.write(SLOT, &legacy).await.unwrap();

        open_store(storage.clone()).await;

        let bytes = storage.read(SLOT).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], codec::CODEC_VERSION);
    }
}
