//! VibeMail Storage - Persisted collections
//!
//! This crate owns the account and campaign stores, the versioned slot
//! codec and the slot backends (local filesystem and in-memory).

pub mod codec;
pub mod file;
pub mod models;
pub mod seed;
pub mod store;
pub mod workspace;

pub use file::{create_storage, LocalStorage, MemoryStorage, SlotStorage};
pub use models::*;
pub use store::{CollectionStore, Snapshot, StoreGuard, Update};
pub use workspace::{
    AccountStore, CampaignStore, Transaction, Workspace, ACCOUNTS_SLOT, CAMPAIGNS_SLOT,
};
