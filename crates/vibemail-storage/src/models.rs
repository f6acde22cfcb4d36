//! Persisted models
//!
//! Field names serialize in camelCase so collections exported from the
//! browser edition of VibeMail load without conversion.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use vibemail_common::types::{
    new_id, AccountId, AccountStatus, CampaignId, CampaignStatus, Provider, StepId, ThreadId,
    ThreadStatus,
};

/// Default daily quota for newly connected accounts
pub const DEFAULT_DAILY_LIMIT: u32 = 50;

/// Default lead count for newly created campaigns
pub const DEFAULT_TOTAL_LEADS: u32 = 50;

/// Name given to campaigns created without one
pub const DEFAULT_CAMPAIGN_NAME: &str = "New Campaign";

/// Sending account model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAccount {
    pub id: AccountId,
    pub email: String,
    pub provider: Provider,
    pub status: AccountStatus,
    pub warmup_enabled: bool,
    pub daily_limit: u32,
    pub sent_today: u32,
    /// UTC day that `sent_today` counts; absent until the first charge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_date: Option<NaiveDate>,
}

impl EmailAccount {
    /// Whether the account can take another send today
    pub fn has_quota(&self) -> bool {
        self.sent_today < self.daily_limit
    }

    /// Whether the engine may charge this account
    pub fn is_sendable(&self) -> bool {
        self.status == AccountStatus::Active && self.has_quota()
    }

    /// Sends left before the daily ceiling
    pub fn remaining_quota(&self) -> u32 {
        self.daily_limit.saturating_sub(self.sent_today)
    }
}

/// A single step in a campaign sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CampaignStep {
    Email {
        id: StepId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subject: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Wait {
        id: StepId,
        #[serde(rename = "waitDays")]
        wait_days: u32,
    },
}

impl CampaignStep {
    /// Build an email step with a fresh id
    pub fn email(subject: impl Into<String>, body: impl Into<String>) -> Self {
        CampaignStep::Email {
            id: new_id(),
            subject: Some(subject.into()),
            body: Some(body.into()),
        }
    }

    /// Build a wait step with a fresh id
    pub fn wait(days: u32) -> Self {
        CampaignStep::Wait {
            id: new_id(),
            wait_days: days,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            CampaignStep::Email { id, .. } | CampaignStep::Wait { id, .. } => id,
        }
    }
}

/// Campaign model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub status: CampaignStatus,
    pub total_leads: u32,
    pub sent: u32,
    pub opened: u32,
    pub clicked: u32,
    pub replied: u32,
    #[serde(default)]
    pub steps: Vec<CampaignStep>,
    pub created_at: DateTime<Utc>,
    /// Last tick that advanced this campaign (epoch milliseconds on the wire)
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_run_timestamp: Option<DateTime<Utc>>,
}

impl Campaign {
    /// Create a campaign from user input, with zeroed counters
    pub fn new(input: CreateCampaign, now: DateTime<Utc>) -> Self {
        let name = input
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_CAMPAIGN_NAME.to_string());
        let status = if input.steps.is_empty() {
            CampaignStatus::Draft
        } else {
            CampaignStatus::Paused
        };

        Self {
            id: new_id(),
            name,
            status,
            total_leads: input.total_leads.unwrap_or(DEFAULT_TOTAL_LEADS),
            sent: 0,
            opened: 0,
            clicked: 0,
            replied: 0,
            steps: input.steps,
            created_at: now,
            last_run_timestamp: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == CampaignStatus::Running
    }

    /// Whether every lead has been sent to
    pub fn is_exhausted(&self) -> bool {
        self.sent >= self.total_leads
    }

    /// Calculate progress percentage
    pub fn progress_percentage(&self) -> f64 {
        if self.total_leads == 0 {
            0.0
        } else {
            (self.sent as f64 / self.total_leads as f64) * 100.0
        }
    }
}

/// Create campaign input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaign {
    pub name: Option<String>,
    pub total_leads: Option<u32>,
    #[serde(default)]
    pub steps: Vec<CampaignStep>,
}

/// Connect account input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccount {
    pub email: String,
    pub provider: Provider,
    pub daily_limit: Option<u32>,
}

impl EmailAccount {
    /// Create a freshly connected account
    pub fn new(input: CreateAccount) -> Self {
        Self {
            id: new_id(),
            email: input.email.trim().to_string(),
            provider: input.provider,
            status: AccountStatus::Active,
            warmup_enabled: true,
            daily_limit: input.daily_limit.unwrap_or(DEFAULT_DAILY_LIMIT),
            sent_today: 0,
            quota_date: None,
        }
    }
}

/// Inbox thread model (seeded, read-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageThread {
    pub id: ThreadId,
    pub lead_name: String,
    pub lead_email: String,
    pub last_message: String,
    /// Display timestamp as shown in the inbox ("10:30 AM", "Yesterday")
    pub timestamp: String,
    pub status: ThreadStatus,
    pub campaign_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_campaign_from_browser_json() {
        let json = r#"{
            "id": "1",
            "name": "Initial Outreach",
            "status": "running",
            "totalLeads": 100,
            "sent": 10,
            "opened": 4,
            "clicked": 0,
            "replied": 1,
            "steps": [
                {"id": "1", "type": "email", "subject": "Hi", "body": "Hello there"},
                {"id": "2", "type": "wait", "waitDays": 3}
            ],
            "createdAt": "2024-05-01T10:00:00.000Z",
            "lastRunTimestamp": 1714557600000
        }"#;

        let campaign: Campaign = serde_json::from_str(json).unwrap();
        assert_eq!(campaign.status, CampaignStatus::Running);
        assert_eq!(campaign.total_leads, 100);
        assert_eq!(campaign.steps.len(), 2);
        assert_eq!(campaign.steps[1], CampaignStep::Wait { id: "2".into(), wait_days: 3 });
        assert_eq!(
            campaign.last_run_timestamp,
            Some(Utc.timestamp_millis_opt(1714557600000).unwrap())
        );

        let value = serde_json::to_value(&campaign).unwrap();
        assert_eq!(value["totalLeads"], 100);
        assert_eq!(value["lastRunTimestamp"], 1714557600000i64);
        assert_eq!(value["steps"][1]["waitDays"], 3);
    }

    #[test]
    fn test_account_from_browser_json() {
        let json = r#"{"id":"1","email":"sales@vibe-agency.com","provider":"google",
            "status":"reconnect","warmupEnabled":true,"dailyLimit":50,"sentToday":12}"#;

        let account: EmailAccount = serde_json::from_str(json).unwrap();
        assert_eq!(account.status, AccountStatus::NeedsReconnect);
        assert_eq!(account.quota_date, None);
        assert_eq!(account.remaining_quota(), 38);
        assert!(!account.is_sendable());
    }

    #[test]
    fn test_new_campaign_defaults() {
        let now = Utc::now();
        let draft = Campaign::new(CreateCampaign::default(), now);
        assert_eq!(draft.name, DEFAULT_CAMPAIGN_NAME);
        assert_eq!(draft.status, CampaignStatus::Draft);
        assert_eq!(draft.total_leads, DEFAULT_TOTAL_LEADS);

        let ready = Campaign::new(
            CreateCampaign {
                name: Some("  Founders  ".into()),
                total_leads: Some(10),
                steps: vec![CampaignStep::email("Hello", "World")],
            },
            now,
        );
        assert_eq!(ready.name, "Founders");
        assert_eq!(ready.status, CampaignStatus::Paused);
        assert_eq!(ready.progress_percentage(), 0.0);
    }
}
