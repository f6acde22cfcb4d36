//! Account Manager - Connects and configures sending accounts

use std::sync::Arc;
use tracing::info;
use vibemail_common::types::{AccountStatus, EmailAddress};
use vibemail_common::{Error, Result};
use vibemail_storage::models::{CreateAccount, EmailAccount};
use vibemail_storage::{Update, Workspace};

/// Account Manager
#[derive(Clone)]
pub struct AccountManager {
    workspace: Arc<Workspace>,
}

impl AccountManager {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }

    /// All accounts, in connection order
    pub async fn list(&self) -> Vec<EmailAccount> {
        self.workspace.accounts().get_all().await.items.to_vec()
    }

    pub async fn get(&self, id: &str) -> Result<EmailAccount> {
        self.workspace
            .accounts()
            .get_all()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Connect a new account
    pub async fn add(&self, input: CreateAccount) -> Result<EmailAccount> {
        let address: EmailAddress = input.email.parse()?;
        if input.daily_limit == Some(0) {
            return Err(Error::Validation(
                "Daily limit must be positive".to_string(),
            ));
        }

        let account = EmailAccount::new(CreateAccount {
            email: address.to_string(),
            ..input
        });

        let account = self
            .workspace
            .accounts()
            .update(|accounts| {
                if accounts
                    .iter()
                    .any(|a| a.email.eq_ignore_ascii_case(&account.email))
                {
                    return Err(Error::Conflict(format!(
                        "Account {} is already connected",
                        account.email
                    )));
                }
                let mut next = accounts.to_vec();
                next.push(account.clone());
                Ok(Update::Replace(next, account))
            })
            .await?;

        info!("Connected account {} ({})", account.email, account.provider);
        Ok(account)
    }

    /// Flip the warmup flag
    pub async fn toggle_warmup(&self, id: &str) -> Result<EmailAccount> {
        self.modify(id, |account| {
            account.warmup_enabled = !account.warmup_enabled;
            Ok(())
        })
        .await
    }

    pub async fn set_status(&self, id: &str, status: AccountStatus) -> Result<EmailAccount> {
        let account = self
            .modify(id, |account| {
                account.status = status;
                Ok(())
            })
            .await?;
        info!("Account {} is now {}", account.email, status);
        Ok(account)
    }

    /// Change the daily ceiling; today's count is clamped to it
    pub async fn set_daily_limit(&self, id: &str, limit: u32) -> Result<EmailAccount> {
        if limit == 0 {
            return Err(Error::Validation(
                "Daily limit must be positive".to_string(),
            ));
        }
        self.modify(id, |account| {
            account.daily_limit = limit;
            account.sent_today = account.sent_today.min(limit);
            Ok(())
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.workspace
            .accounts()
            .update(|accounts| {
                let next: Vec<_> = accounts.iter().filter(|a| a.id != id).cloned().collect();
                if next.len() == accounts.len() {
                    return Err(not_found(id));
                }
                Ok(Update::Replace(next, ()))
            })
            .await?;
        info!("Deleted account {}", id);
        Ok(())
    }

    async fn modify<F>(&self, id: &str, f: F) -> Result<EmailAccount>
    where
        F: FnOnce(&mut EmailAccount) -> Result<()>,
    {
        self.workspace
            .accounts()
            .update(|accounts| {
                let index = accounts
                    .iter()
                    .position(|a| a.id == id)
                    .ok_or_else(|| not_found(id))?;
                let mut next = accounts.to_vec();
                f(&mut next[index])?;
                let updated = next[index].clone();
                Ok(Update::Replace(next, updated))
            })
            .await
    }
}

fn not_found(id: &str) -> Error {
    Error::NotFound(format!("Account not found: {}", id))
}
