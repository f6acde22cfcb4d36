//! Dashboard statistics

use serde::Serialize;
use vibemail_common::types::CampaignId;
use vibemail_storage::models::Campaign;

/// Progress of a running campaign
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProgress {
    pub id: CampaignId,
    pub name: String,
    pub sent: u32,
    pub total_leads: u32,
    /// `sent / totalLeads` as a percentage
    pub progress: f64,
}

/// Aggregate outreach metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_sent: u64,
    pub total_opened: u64,
    pub total_replied: u64,
    /// Rounded percentage of sent emails that were opened
    pub open_rate: u32,
    /// Rounded percentage of sent emails that got a reply
    pub reply_rate: u32,
    pub active_campaigns: usize,
    /// Whether the simulation has anything to advance
    pub engine_active: bool,
    pub running: Vec<CampaignProgress>,
}

fn rate(part: u64, total: u64) -> u32 {
    if total == 0 {
        0
    } else {
        (part as f64 / total as f64 * 100.0).round() as u32
    }
}

impl DashboardStats {
    pub fn from_campaigns(campaigns: &[Campaign]) -> Self {
        let total_sent: u64 = campaigns.iter().map(|c| c.sent as u64).sum();
        let total_opened: u64 = campaigns.iter().map(|c| c.opened as u64).sum();
        let total_replied: u64 = campaigns.iter().map(|c| c.replied as u64).sum();

        let running: Vec<CampaignProgress> = campaigns
            .iter()
            .filter(|c| c.is_running())
            .map(|c| CampaignProgress {
                id: c.id.clone(),
                name: c.name.clone(),
                sent: c.sent,
                total_leads: c.total_leads,
                progress: c.progress_percentage(),
            })
            .collect();

        Self {
            total_sent,
            total_opened,
            total_replied,
            open_rate: rate(total_opened, total_sent),
            reply_rate: rate(total_replied, total_sent),
            active_campaigns: running.len(),
            engine_active: !running.is_empty(),
            running,
        }
    }
}
