//! Copywriter - Fallback-safe front for the assistant backend

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use vibemail_storage::models::DEFAULT_CAMPAIGN_NAME;

use super::intent::{IntentAnalysis, LeadIntent};
use super::CopyAssistant;

/// Returned in place of copy when the backend fails
pub const COPY_FALLBACK: &str = "Error generating email. Please try again.";

/// Returned in place of an intent analysis when the backend fails
pub const INTENT_FALLBACK: &str = "Neutral";

/// A drafted email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

/// Split generated copy into subject and body.
///
/// The subject is everything before the first `Body:` marker with the first
/// `Subject:` label removed. When the text has no body section the whole
/// text is used as the body.
pub fn parse_draft(text: &str) -> EmailDraft {
    let mut sections = text.split("Body:");

    let subject = sections
        .next()
        .map(|head| head.replacen("Subject:", "", 1).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_CAMPAIGN_NAME.to_string());

    let body = sections
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(text)
        .to_string();

    EmailDraft { subject, body }
}

/// Wraps a backend and never fails
#[derive(Clone)]
pub struct Copywriter {
    assistant: Arc<dyn CopyAssistant>,
    context: String,
}

impl Copywriter {
    pub fn new(assistant: Arc<dyn CopyAssistant>, context: impl Into<String>) -> Self {
        Self {
            assistant,
            context: context.into(),
        }
    }

    /// Backend name
    pub fn backend(&self) -> &str {
        self.assistant.name()
    }

    /// Generated copy, or `COPY_FALLBACK`
    pub async fn generate_email_copy(&self, prompt: &str) -> String {
        match self
            .assistant
            .generate_email_copy(prompt, &self.context)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(backend = self.assistant.name(), "Email copy generation failed: {}", e);
                COPY_FALLBACK.to_string()
            }
        }
    }

    /// Generated copy split into subject and body
    pub async fn draft(&self, prompt: &str) -> EmailDraft {
        parse_draft(&self.generate_email_copy(prompt).await)
    }

    /// Intent analysis of a reply, or `INTENT_FALLBACK`
    pub async fn analyze_lead_intent(&self, reply: &str) -> IntentAnalysis {
        match self.assistant.analyze_lead_intent(reply).await {
            Ok(text) => IntentAnalysis {
                intent: LeadIntent::detect(&text),
                analysis: text,
                fallback: false,
            },
            Err(e) => {
                warn!(backend = self.assistant.name(), "Lead intent analysis failed: {}", e);
                IntentAnalysis {
                    analysis: INTENT_FALLBACK.to_string(),
                    intent: LeadIntent::Neutral,
                    fallback: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{AssistantError, DisabledAssistant};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct CannedAssistant(&'static str);

    #[async_trait]
    impl CopyAssistant for CannedAssistant {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate_email_copy(
            &self,
            prompt: &str,
            context: &str,
        ) -> Result<String, AssistantError> {
            assert_eq!(context, "VibeMail AI outreach");
            assert!(!prompt.is_empty());
            Ok(self.0.to_string())
        }

        async fn analyze_lead_intent(&self, _reply: &str) -> Result<String, AssistantError> {
            Ok(self.0.to_string())
        }
    }

    fn copywriter(assistant: impl CopyAssistant + 'static) -> Copywriter {
        Copywriter::new(Arc::new(assistant), "VibeMail AI outreach")
    }

    #[test]
    fn test_parse_subject_and_body() {
        assert_eq!(
            parse_draft("Subject: Hello\nBody: World"),
            EmailDraft {
                subject: "Hello".to_string(),
                body: "World".to_string()
            }
        );
    }

    #[test]
    fn test_parse_without_body_uses_whole_text() {
        let draft = parse_draft("Subject: Quick question");
        assert_eq!(draft.subject, "Quick question");
        assert_eq!(draft.body, "Subject: Quick question");
    }

    #[test]
    fn test_parse_empty_subject_defaults() {
        let draft = parse_draft("Body: Just the body");
        assert_eq!(draft.subject, "New Campaign");
        assert_eq!(draft.body, "Just the body");
    }

    #[test]
    fn test_parse_keeps_second_segment_only() {
        let draft = parse_draft("Subject: A\nBody: first Body: second");
        assert_eq!(draft.subject, "A");
        assert_eq!(draft.body, "first");
    }

    #[tokio::test]
    async fn test_failing_backend_yields_fallbacks() {
        let writer = copywriter(DisabledAssistant);

        assert_eq!(writer.generate_email_copy("anything").await, COPY_FALLBACK);

        let draft = writer.draft("anything").await;
        assert_eq!(draft.subject, COPY_FALLBACK);
        assert_eq!(draft.body, COPY_FALLBACK);

        let analysis = writer.analyze_lead_intent("Can we chat?").await;
        assert_eq!(analysis.analysis, "Neutral");
        assert_eq!(analysis.intent, LeadIntent::Neutral);
        assert!(analysis.fallback);
    }

    #[tokio::test]
    async fn test_successful_backend_text_passes_through() {
        let writer = copywriter(CannedAssistant("Subject: Scale outbound\nBody: Worth a chat?"));
        let draft = writer.draft("founders").await;
        assert_eq!(draft.subject, "Scale outbound");
        assert_eq!(draft.body, "Worth a chat?");

        let writer = copywriter(CannedAssistant("Meeting Booked - they proposed Tuesday."));
        let analysis = writer.analyze_lead_intent("Tuesday works").await;
        assert_eq!(analysis.intent, LeadIntent::MeetingBooked);
        assert!(!analysis.fallback);
    }
}
