//! Shared handler state

use std::sync::Arc;
use vibemail_common::config::EngineConfig;
use vibemail_core::{AccountManager, CampaignManager, Copywriter, EngineMonitor, Unibox};
use vibemail_storage::Workspace;

/// Application state
pub struct AppState {
    pub workspace: Arc<Workspace>,
    pub accounts: AccountManager,
    pub campaigns: CampaignManager,
    pub unibox: Unibox,
    pub copywriter: Copywriter,
    pub engine: Arc<EngineMonitor>,
    pub engine_config: EngineConfig,
}

impl AppState {
    pub fn new(
        workspace: Arc<Workspace>,
        copywriter: Copywriter,
        engine: Arc<EngineMonitor>,
        engine_config: EngineConfig,
    ) -> Self {
        Self {
            accounts: AccountManager::new(workspace.clone()),
            campaigns: CampaignManager::new(workspace.clone(), copywriter.clone()),
            unibox: Unibox::new(copywriter.clone()),
            workspace,
            copywriter,
            engine,
            engine_config,
        }
    }
}
