//! Simulation Worker - Runs engine ticks on a fixed interval

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use vibemail_common::config::EngineConfig;
use vibemail_common::Result;
use vibemail_storage::{Transaction, Workspace};

use super::engine::{simulate_tick, EnginePolicy, TickReport};
use super::rng::{RandomTicks, TickRng};

/// Observable worker state, shared with the API
#[derive(Debug, Default)]
pub struct EngineMonitor {
    ticks: AtomicU64,
    last_report: RwLock<Option<TickReport>>,
}

impl EngineMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    async fn record(&self, report: TickReport) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        *self.last_report.write().await = Some(report);
    }

    /// Completed ticks since start
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub async fn last_report(&self) -> Option<TickReport> {
        self.last_report.read().await.clone()
    }
}

/// Engine status as reported by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    /// Whether the worker is configured to run
    pub enabled: bool,
    /// Whether any campaign is running
    pub active: bool,
    pub tick_interval_secs: u64,
    pub ticks: u64,
    pub last_tick: Option<TickReport>,
}

/// Simulation Worker
pub struct SimulationWorker {
    workspace: Arc<Workspace>,
    policy: EnginePolicy,
    tick_interval: Duration,
    rng: Mutex<Box<dyn TickRng + Send>>,
    monitor: Arc<EngineMonitor>,
}

impl SimulationWorker {
    /// Create a new simulation worker
    pub fn new(workspace: Arc<Workspace>, config: &EngineConfig) -> Self {
        Self {
            workspace,
            policy: EnginePolicy::from(config),
            tick_interval: Duration::from_secs(config.tick_interval_secs),
            rng: Mutex::new(Box::new(RandomTicks::from_seed(config.seed))),
            monitor: Arc::new(EngineMonitor::new()),
        }
    }

    /// Replace the random source
    pub fn with_rng(mut self, rng: impl TickRng + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    /// Set tick interval
    pub fn with_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Share an existing monitor
    pub fn with_monitor(mut self, monitor: Arc<EngineMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn monitor(&self) -> Arc<EngineMonitor> {
        Arc::clone(&self.monitor)
    }

    /// Run one tick now
    pub async fn tick_once(&self) -> Result<TickReport> {
        self.tick_at(Utc::now()).await
    }

    /// Run one tick with an explicit clock
    pub async fn tick_at(&self, now: DateTime<Utc>) -> Result<TickReport> {
        let mut rng = self.rng.lock().await;
        let policy = &self.policy;

        let report = self
            .workspace
            .transact(|accounts, campaigns| {
                let outcome = simulate_tick(accounts, campaigns, now, &mut **rng, policy);
                Transaction {
                    accounts: outcome.accounts,
                    campaigns: outcome.campaigns,
                    output: outcome.report,
                }
            })
            .await?;

        if report.campaigns_completed > 0 {
            info!("{} campaign(s) completed", report.campaigns_completed);
        }
        debug!(
            advanced = report.campaigns_advanced,
            emails = report.emails_simulated,
            opens = report.opens,
            replies = report.replies,
            charged = report.accounts_charged,
            "Simulation tick"
        );

        self.monitor.record(report.clone()).await;
        Ok(report)
    }

    /// Run the worker until `shutdown` is cancelled
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately; wait a full interval instead
        ticker.tick().await;

        info!(
            "Simulation worker started (interval: {}s, max batch: {})",
            self.tick_interval.as_secs(),
            self.policy.max_batch
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Simulation worker stopped after {} ticks", self.monitor.ticks());
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick_once().await {
                        error!("Error running simulation tick: {}", e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sending::rng::ScriptedTicks;
    use pretty_assertions::assert_eq;
    use vibemail_common::types::CampaignStatus;
    use vibemail_storage::{MemoryStorage, SlotStorage};

    async fn workspace() -> Arc<Workspace> {
        let storage: Arc<dyn SlotStorage> = Arc::new(MemoryStorage::new());
        Arc::new(Workspace::load(storage).await.unwrap())
    }

    async fn start_seed_campaign(workspace: &Workspace) {
        let mut campaigns = workspace.campaigns().get_all().await.items.to_vec();
        campaigns[0].status = CampaignStatus::Running;
        workspace.campaigns().replace_all(campaigns).await.unwrap();
    }

    #[tokio::test]
    async fn test_tick_commits_both_stores() {
        let workspace = workspace().await;
        start_seed_campaign(&workspace).await;

        let worker = SimulationWorker::new(workspace.clone(), &EngineConfig::default())
            .with_rng(ScriptedTicks::always(2, false));
        let report = worker.tick_once().await.unwrap();

        assert_eq!(report.emails_simulated, 2);
        assert_eq!(workspace.campaigns().get_all().await.items[0].sent, 2);
        // seed account starts at 12
        assert_eq!(workspace.accounts().get_all().await.items[0].sent_today, 13);
        assert_eq!(worker.monitor().ticks(), 1);
        assert_eq!(worker.monitor().last_report().await, Some(report));
    }

    #[tokio::test]
    async fn test_idle_tick_writes_nothing() {
        let workspace = workspace().await;
        let worker = SimulationWorker::new(workspace.clone(), &EngineConfig::default());

        let report = worker.tick_once().await.unwrap();

        assert!(report.is_idle());
        assert_eq!(workspace.campaigns().get_all().await.revision, 0);
        assert_eq!(workspace.accounts().get_all().await.revision, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ticks_on_interval_until_cancelled() {
        let workspace = workspace().await;
        start_seed_campaign(&workspace).await;

        let worker = Arc::new(
            SimulationWorker::new(workspace.clone(), &EngineConfig::default())
                .with_rng(ScriptedTicks::always(1, false)),
        );
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn({
            let worker = worker.clone();
            let shutdown = shutdown.clone();
            async move { worker.run(shutdown).await }
        });

        // no tick before the first full interval
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(worker.monitor().ticks(), 0);

        tokio::time::sleep(Duration::from_secs(8)).await;
        assert_eq!(worker.monitor().ticks(), 2);
        assert_eq!(workspace.campaigns().get_all().await.items[0].sent, 2);

        shutdown.cancel();
        handle.await.unwrap();

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(worker.monitor().ticks(), 2);
    }
}
