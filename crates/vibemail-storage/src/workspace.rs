//! Workspace
//!
//! Owns the account and campaign stores and commits changes that span both.
//! Cross-store commits lock accounts first, then campaigns.

use std::sync::Arc;
use tracing::{debug, error, info};
use vibemail_common::Result;

use crate::file::SlotStorage;
use crate::models::{Campaign, EmailAccount};
use crate::seed;
use crate::store::CollectionStore;

/// Slot holding the account collection
pub const ACCOUNTS_SLOT: &str = "vibemail_accounts";

/// Slot holding the campaign collection
pub const CAMPAIGNS_SLOT: &str = "vibemail_campaigns";

pub type AccountStore = CollectionStore<EmailAccount>;
pub type CampaignStore = CollectionStore<Campaign>;

/// Result of a cross-store closure. `None` leaves that collection untouched.
pub struct Transaction<R> {
    pub accounts: Option<Vec<EmailAccount>>,
    pub campaigns: Option<Vec<Campaign>>,
    pub output: R,
}

impl<R> Transaction<R> {
    /// A transaction that writes nothing
    pub fn unchanged(output: R) -> Self {
        Self {
            accounts: None,
            campaigns: None,
            output,
        }
    }
}

/// The two persisted stores
pub struct Workspace {
    storage: Arc<dyn SlotStorage>,
    accounts: AccountStore,
    campaigns: CampaignStore,
}

impl Workspace {
    /// Load both collections, seeding any slot that is missing or rejected
    pub async fn load(storage: Arc<dyn SlotStorage>) -> Result<Self> {
        let accounts = CollectionStore::open(ACCOUNTS_SLOT, storage.clone(), seed::accounts).await?;
        let campaigns =
            CollectionStore::open(CAMPAIGNS_SLOT, storage.clone(), seed::campaigns).await?;

        info!(
            accounts = accounts.get_all().await.len(),
            campaigns = campaigns.get_all().await.len(),
            "Workspace loaded"
        );

        Ok(Self {
            storage,
            accounts,
            campaigns,
        })
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn campaigns(&self) -> &CampaignStore {
        &self.campaigns
    }

    /// Run `f` over both collections and commit its replacements together.
    ///
    /// Both write locks are held for the whole call, so no single-store
    /// update can interleave. Both slots are written before either in-memory
    /// collection is swapped; when the second write fails the first slot is
    /// rewritten with its previous contents.
    pub async fn transact<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&[EmailAccount], &[Campaign]) -> Transaction<R>,
    {
        let mut accounts = self.accounts.lock().await;
        let mut campaigns = self.campaigns.lock().await;

        let Transaction {
            accounts: next_accounts,
            campaigns: next_campaigns,
            output,
        } = f(accounts.items(), campaigns.items());

        let account_bytes = next_accounts
            .as_deref()
            .map(|items| accounts.encode(items))
            .transpose()?;
        let campaign_bytes = next_campaigns
            .as_deref()
            .map(|items| campaigns.encode(items))
            .transpose()?;

        // previous campaign slot contents, restored if the account write fails
        let campaign_rollback = match (&campaign_bytes, &account_bytes) {
            (Some(_), Some(_)) => Some(campaigns.encode(campaigns.items())?),
            _ => None,
        };

        if let Some(bytes) = &campaign_bytes {
            campaigns.persist(bytes).await?;
        }
        if let Some(bytes) = &account_bytes {
            if let Err(e) = accounts.persist(bytes).await {
                if let Some(previous) = &campaign_rollback {
                    if let Err(restore) = campaigns.persist(previous).await {
                        error!(
                            "Failed to restore campaign slot after account write failed: {}",
                            restore
                        );
                    }
                }
                return Err(e);
            }
        }

        if let Some(items) = next_campaigns {
            campaigns.swap(items);
        }
        if let Some(items) = next_accounts {
            accounts.swap(items);
        }

        debug!(
            accounts_written = account_bytes.is_some(),
            campaigns_written = campaign_bytes.is_some(),
            "Transaction committed"
        );

        Ok(output)
    }

    /// Probe the slot backend
    pub async fn health_check(&self) -> Result<()> {
        self.storage.health_check().await
    }
}
