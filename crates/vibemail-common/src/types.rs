//! Common types for VibeMail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for sending accounts
pub type AccountId = String;

/// Identifier for campaigns
pub type CampaignId = String;

/// Identifier for campaign steps
pub type StepId = String;

/// Identifier for inbox threads
pub type ThreadId = String;

/// Timestamp wrapper
pub type Timestamp = DateTime<Utc>;

/// Generate a fresh identifier for a new record
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress {
    pub local: String,
    pub domain: String,
}

impl EmailAddress {
    /// Create a new email address
    pub fn new(local: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            domain: domain.into(),
        }
    }

    /// Parse an email address from a string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (local, domain) = s.split_once('@')?;
        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || !domain.contains('.')
            || s.chars().any(char::is_whitespace)
        {
            return None;
        }
        Some(Self::new(local, domain.to_lowercase()))
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

impl std::str::FromStr for EmailAddress {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::Error::Validation(format!("Invalid email address: {}", s)))
    }
}

/// Mailbox provider of a sending account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Primary webmail (Google Workspace / Gmail)
    Google,
    /// Secondary webmail (Outlook / Microsoft 365)
    Outlook,
    /// Generic SMTP relay
    Smtp,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Google => write!(f, "google"),
            Provider::Outlook => write!(f, "outlook"),
            Provider::Smtp => write!(f, "smtp"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Provider::Google),
            "outlook" => Ok(Provider::Outlook),
            "smtp" => Ok(Provider::Smtp),
            _ => Err(format!("Invalid provider: {}", s)),
        }
    }
}

/// Connection status of a sending account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    /// Credentials expired; the account needs to be reconnected
    #[serde(rename = "reconnect")]
    NeedsReconnect,
    Disabled,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "active"),
            AccountStatus::NeedsReconnect => write!(f, "reconnect"),
            AccountStatus::Disabled => write!(f, "disabled"),
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "reconnect" => Ok(AccountStatus::NeedsReconnect),
            "disabled" => Ok(AccountStatus::Disabled),
            _ => Err(format!("Invalid account status: {}", s)),
        }
    }
}

/// Campaign lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Paused,
    Running,
    /// Only reached when the engine runs with auto-completion
    Completed,
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignStatus::Draft => write!(f, "draft"),
            CampaignStatus::Paused => write!(f, "paused"),
            CampaignStatus::Running => write!(f, "running"),
            CampaignStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CampaignStatus::Draft),
            "paused" => Ok(CampaignStatus::Paused),
            "running" => Ok(CampaignStatus::Running),
            "completed" => Ok(CampaignStatus::Completed),
            _ => Err(format!("Invalid campaign status: {}", s)),
        }
    }
}

/// Read state of an inbox thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadStatus {
    Unread,
    Read,
    Replied,
}

impl std::str::FromStr for ThreadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unread" => Ok(ThreadStatus::Unread),
            "read" => Ok(ThreadStatus::Read),
            "replied" => Ok(ThreadStatus::Replied),
            _ => Err(format!("Invalid thread status: {}", s)),
        }
    }
}

/// How the engine charges account daily quota
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaAccounting {
    /// One unit per eligible account per tick while any campaign runs
    #[default]
    PerTick,
    /// One unit per simulated email, spread across eligible accounts
    PerEmail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_address_parse() {
        let email = EmailAddress::parse("sales@Vibe-Agency.com").unwrap();
        assert_eq!(email.local, "sales");
        assert_eq!(email.domain, "vibe-agency.com");
        assert_eq!(email.to_string(), "sales@vibe-agency.com");
    }

    #[test]
    fn test_email_address_invalid() {
        assert!(EmailAddress::parse("invalid").is_none());
        assert!(EmailAddress::parse("@example.com").is_none());
        assert!(EmailAddress::parse("user@").is_none());
        assert!(EmailAddress::parse("user@localhost").is_none());
        assert!(EmailAddress::parse("a b@example.com").is_none());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&AccountStatus::NeedsReconnect).unwrap(),
            "\"reconnect\""
        );
        assert_eq!(
            serde_json::from_str::<CampaignStatus>("\"running\"").unwrap(),
            CampaignStatus::Running
        );
        assert_eq!("smtp".parse::<Provider>().unwrap(), Provider::Smtp);
        assert_eq!(CampaignStatus::Paused.to_string(), "paused");
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
