//! Built-in seed data used when a slot is empty

use chrono::Utc;
use vibemail_common::types::{AccountStatus, CampaignStatus, Provider, ThreadStatus};

use crate::models::{Campaign, EmailAccount, MessageThread};

pub fn accounts() -> Vec<EmailAccount> {
    vec![EmailAccount {
        id: "1".to_string(),
        email: "sales@vibe-agency.com".to_string(),
        provider: Provider::Google,
        status: AccountStatus::Active,
        warmup_enabled: true,
        daily_limit: 50,
        sent_today: 12,
        quota_date: None,
    }]
}

pub fn campaigns() -> Vec<Campaign> {
    vec![Campaign {
        id: "1".to_string(),
        name: "Initial Outreach".to_string(),
        status: CampaignStatus::Paused,
        total_leads: 100,
        sent: 0,
        opened: 0,
        clicked: 0,
        replied: 0,
        steps: Vec::new(),
        created_at: Utc::now(),
        last_run_timestamp: None,
    }]
}

pub fn threads() -> Vec<MessageThread> {
    vec![
        MessageThread {
            id: "1".to_string(),
            lead_name: "Jane Cooper".to_string(),
            lead_email: "jane@paradigm.com".to_string(),
            last_message: "Hi, I'm interested in learning more about your tool. Can we chat tomorrow?"
                .to_string(),
            timestamp: "10:30 AM".to_string(),
            status: ThreadStatus::Unread,
            campaign_name: "Q3 Enterprise".to_string(),
        },
        MessageThread {
            id: "2".to_string(),
            lead_name: "Guy Hawkins".to_string(),
            lead_email: "guy.h@volts.io".to_string(),
            last_message: "Thanks for the outreach, but we aren't looking for a new solution right now."
                .to_string(),
            timestamp: "Yesterday".to_string(),
            status: ThreadStatus::Replied,
            campaign_name: "Startup Founders".to_string(),
        },
        MessageThread {
            id: "3".to_string(),
            lead_name: "Cameron Williamson".to_string(),
            lead_email: "cam@west.co".to_string(),
            last_message: "Is there a bulk pricing option available for teams?".to_string(),
            timestamp: "2 days ago".to_string(),
            status: ThreadStatus::Read,
            campaign_name: "Q3 Enterprise".to_string(),
        },
    ]
}
