//! VibeMail Core - Sending simulation and outreach workflows
//!
//! This crate provides the simulation engine and its worker, the account
//! and campaign managers, dashboard statistics, the unified inbox and the
//! AI copy/intent assistant.

pub mod accounts;
pub mod assistant;
pub mod campaigns;
pub mod dashboard;
pub mod sending;
pub mod unibox;

pub use accounts::AccountManager;
pub use assistant::{create_assistant, CopyAssistant, Copywriter, EmailDraft, GeminiClient};
pub use campaigns::CampaignManager;
pub use dashboard::DashboardStats;
pub use sending::{EngineMonitor, EnginePolicy, EngineStatus, SimulationWorker, TickReport};
pub use unibox::{ThreadQuery, Unibox};
