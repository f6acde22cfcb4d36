//! AI Assistant
//!
//! Copy drafting and reply intent analysis behind a text-generation backend.
//! Backend failures never reach callers: the `Copywriter` swaps them for
//! fixed fallback text.

mod copywriter;
mod gemini;
mod intent;

pub use copywriter::{parse_draft, Copywriter, EmailDraft, COPY_FALLBACK, INTENT_FALLBACK};
pub use gemini::GeminiClient;
pub use intent::{IntentAnalysis, LeadIntent};

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use vibemail_common::config::AssistantConfig;

/// Assistant backend errors
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Assistant is disabled")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Backend returned no text")]
    EmptyResponse,
}

/// Text-generation backend
#[async_trait]
pub trait CopyAssistant: Send + Sync {
    /// Backend name for logs and health output
    fn name(&self) -> &str;

    /// Draft a cold email; the reply carries "Subject:" and "Body:" sections
    async fn generate_email_copy(&self, prompt: &str, context: &str)
        -> Result<String, AssistantError>;

    /// Classify a lead's reply, with a one-sentence rationale
    async fn analyze_lead_intent(&self, reply: &str) -> Result<String, AssistantError>;
}

/// Backend used when no API key is configured
#[derive(Debug, Default)]
pub struct DisabledAssistant;

#[async_trait]
impl CopyAssistant for DisabledAssistant {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn generate_email_copy(
        &self,
        _prompt: &str,
        _context: &str,
    ) -> Result<String, AssistantError> {
        Err(AssistantError::Disabled)
    }

    async fn analyze_lead_intent(&self, _reply: &str) -> Result<String, AssistantError> {
        Err(AssistantError::Disabled)
    }
}

/// Build the configured backend
pub fn create_assistant(config: &AssistantConfig) -> Arc<dyn CopyAssistant> {
    if !config.enabled {
        info!("AI assistant disabled by configuration");
        return Arc::new(DisabledAssistant);
    }

    let Some(api_key) = config.resolve_api_key() else {
        warn!("No AI assistant API key configured, using fallback responses");
        return Arc::new(DisabledAssistant);
    };

    match GeminiClient::new(config, api_key) {
        Ok(client) => {
            info!("AI assistant enabled (model: {})", config.model);
            Arc::new(client)
        }
        Err(e) => {
            warn!("Failed to create AI assistant client: {}", e);
            Arc::new(DisabledAssistant)
        }
    }
}
