//! Simulation engine
//!
//! One tick advances every running campaign that still has leads and charges
//! account quota. The tick is a pure function over snapshots; the worker owns
//! scheduling and persistence.

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use vibemail_common::config::EngineConfig;
use vibemail_common::types::{CampaignStatus, QuotaAccounting};
use vibemail_storage::models::{Campaign, EmailAccount};

use super::quota;
use super::rng::TickRng;

/// Tunables of the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct EnginePolicy {
    pub max_batch: u32,
    pub open_probability: f64,
    pub open_factor: f64,
    pub reply_probability: f64,
    pub quota_accounting: QuotaAccounting,
    pub daily_reset: bool,
    pub auto_complete: bool,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for EnginePolicy {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_batch: config.max_batch,
            open_probability: config.open_probability,
            open_factor: config.open_factor,
            reply_probability: config.reply_probability,
            quota_accounting: config.quota_accounting,
            daily_reset: config.daily_reset,
            auto_complete: config.auto_complete,
        }
    }
}

/// What a tick did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub at: Option<DateTime<Utc>>,
    /// Running campaigns in the input snapshot
    pub running_campaigns: usize,
    pub campaigns_advanced: usize,
    pub emails_simulated: u32,
    pub opens: u32,
    pub replies: u32,
    pub accounts_charged: usize,
    pub quota_charged: u32,
    pub quotas_reset: usize,
    pub campaigns_completed: usize,
}

impl TickReport {
    /// Whether the tick changed anything
    pub fn is_idle(&self) -> bool {
        self.campaigns_advanced == 0
            && self.campaigns_completed == 0
            && self.quota_charged == 0
            && self.quotas_reset == 0
    }
}

/// Replacement collections produced by a tick. `None` means unchanged.
#[derive(Debug)]
pub struct TickOutcome {
    pub accounts: Option<Vec<EmailAccount>>,
    pub campaigns: Option<Vec<Campaign>>,
    pub report: TickReport,
}

/// Run one tick over the given snapshots
pub fn simulate_tick<R>(
    accounts: &[EmailAccount],
    campaigns: &[Campaign],
    now: DateTime<Utc>,
    rng: &mut R,
    policy: &EnginePolicy,
) -> TickOutcome
where
    R: TickRng + ?Sized,
{
    // slots keep `lastRunTimestamp` in epoch milliseconds
    let now = now.trunc_subsecs(3);
    let mut report = TickReport {
        at: Some(now),
        running_campaigns: campaigns.iter().filter(|c| c.is_running()).count(),
        ..TickReport::default()
    };

    let mut next_campaigns = campaigns.to_vec();
    let mut campaigns_changed = false;
    for campaign in next_campaigns.iter_mut() {
        if advance_campaign(campaign, now, rng, policy, &mut report) {
            campaigns_changed = true;
        }
    }

    let mut next_accounts = accounts.to_vec();
    let today = now.date_naive();
    if policy.daily_reset {
        report.quotas_reset = quota::reset_stale(&mut next_accounts, today);
    }
    if report.running_campaigns > 0 {
        match policy.quota_accounting {
            QuotaAccounting::PerTick => {
                let charged = quota::charge_per_tick(&mut next_accounts, today);
                report.accounts_charged = charged;
                report.quota_charged = u32::try_from(charged).unwrap_or(u32::MAX);
            }
            QuotaAccounting::PerEmail => {
                let (charged, sends) =
                    quota::charge_per_email(&mut next_accounts, report.emails_simulated, today);
                report.accounts_charged = charged;
                report.quota_charged = sends;
            }
        }
    }
    let accounts_changed = report.quotas_reset > 0 || report.quota_charged > 0;

    TickOutcome {
        accounts: accounts_changed.then_some(next_accounts),
        campaigns: campaigns_changed.then_some(next_campaigns),
        report,
    }
}

/// Advance one campaign in place. Returns whether it changed.
fn advance_campaign<R>(
    campaign: &mut Campaign,
    now: DateTime<Utc>,
    rng: &mut R,
    policy: &EnginePolicy,
    report: &mut TickReport,
) -> bool
where
    R: TickRng + ?Sized,
{
    if !campaign.is_running() {
        return false;
    }

    if campaign.is_exhausted() {
        if policy.auto_complete {
            campaign.status = CampaignStatus::Completed;
            report.campaigns_completed += 1;
            return true;
        }
        return false;
    }

    let batch = rng.batch_size(policy.max_batch);
    let added = batch.min(campaign.total_leads - campaign.sent);
    campaign.sent += added;
    report.emails_simulated += added;

    if rng.chance(policy.open_probability) {
        // never more opens than emails added this tick
        let opens = ((batch as f64 * policy.open_factor).floor() as u32).min(added);
        campaign.opened += opens;
        report.opens += opens;
    }

    if rng.chance(policy.reply_probability) && campaign.replied < campaign.sent {
        campaign.replied += 1;
        report.replies += 1;
    }

    campaign.last_run_timestamp = Some(now);
    report.campaigns_advanced += 1;

    if policy.auto_complete && campaign.is_exhausted() {
        campaign.status = CampaignStatus::Completed;
        report.campaigns_completed += 1;
    }

    true
}
