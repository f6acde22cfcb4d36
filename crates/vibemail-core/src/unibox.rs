//! Unibox - Unified inbox over lead threads

use vibemail_common::types::ThreadStatus;
use vibemail_common::{Error, Result};
use vibemail_storage::models::MessageThread;
use vibemail_storage::seed;

use crate::assistant::{Copywriter, IntentAnalysis};

/// Thread filter
#[derive(Debug, Clone, Default)]
pub struct ThreadQuery {
    pub status: Option<ThreadStatus>,
    /// Case-insensitive match on lead name, lead email or campaign name
    pub search: Option<String>,
}

impl ThreadQuery {
    fn matches(&self, thread: &MessageThread) -> bool {
        if let Some(status) = self.status {
            if thread.status != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                thread.lead_name.to_lowercase().contains(&term)
                    || thread.lead_email.to_lowercase().contains(&term)
                    || thread.campaign_name.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}

/// Read-only inbox
#[derive(Clone)]
pub struct Unibox {
    threads: Vec<MessageThread>,
    copywriter: Copywriter,
}

impl Unibox {
    /// Inbox over the built-in threads
    pub fn new(copywriter: Copywriter) -> Self {
        Self::with_threads(seed::threads(), copywriter)
    }

    pub fn with_threads(threads: Vec<MessageThread>, copywriter: Copywriter) -> Self {
        Self {
            threads,
            copywriter,
        }
    }

    pub fn list(&self, query: &ThreadQuery) -> Vec<MessageThread> {
        self.threads
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Result<MessageThread> {
        self.threads
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Thread not found: {}", id)))
    }

    /// Intent of the thread's last message
    pub async fn analyze(&self, id: &str) -> Result<IntentAnalysis> {
        let thread = self.get(id)?;
        Ok(self.copywriter.analyze_lead_intent(&thread.last_message).await)
    }
}
