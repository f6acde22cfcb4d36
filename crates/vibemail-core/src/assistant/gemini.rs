//! Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use vibemail_common::config::AssistantConfig;

use super::{AssistantError, CopyAssistant};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// HTTP client for the Gemini API
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    copy_config: GenerationConfig,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(config: &AssistantConfig, api_key: String) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            copy_config: GenerationConfig {
                temperature: config.temperature,
                top_k: config.top_k,
                top_p: config.top_p,
            },
        })
    }

    async fn generate(
        &self,
        prompt: &str,
        generation_config: Option<GenerationConfig>,
    ) -> Result<String, AssistantError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config,
        };

        debug!(model = %self.model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response.json().await?;
        body.text().ok_or(AssistantError::EmptyResponse)
    }
}

fn copy_prompt(prompt: &str, context: &str) -> String {
    format!(
        "Generate a high-converting cold email based on this prompt: \"{}\".\n\
         The context/product is: \"{}\".\n\
         Keep it brief, under 100 words, and focused on a single call to action.\n\
         Provide a \"Subject\" and a \"Body\".",
        prompt, context
    )
}

fn intent_prompt(reply: &str) -> String {
    format!(
        "Analyze this email reply from a lead and categorize its intent.\n\
         Reply: \"{}\"\n\
         Categories: Interested, Not Interested, Out of Office, Meeting Booked.\n\
         Provide a brief 1-sentence explanation why.",
        reply
    )
}

#[async_trait]
impl CopyAssistant for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_email_copy(
        &self,
        prompt: &str,
        context: &str,
    ) -> Result<String, AssistantError> {
        self.generate(&copy_prompt(prompt, context), Some(self.copy_config.clone()))
            .await
    }

    async fn analyze_lead_intent(&self, reply: &str) -> Result<String, AssistantError> {
        self.generate(&intent_prompt(reply), None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";

    fn client(server: &MockServer) -> GeminiClient {
        let config = AssistantConfig {
            endpoint: server.uri(),
            ..AssistantConfig::default()
        };
        GeminiClient::new(&config, "test-key".to_string()).unwrap()
    }

    fn text_response(parts: &[&str]) -> ResponseTemplate {
        let parts: Vec<_> = parts.iter().map(|t| json!({ "text": t })).collect();
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "role": "model", "parts": parts } }]
        }))
    }

    #[tokio::test]
    async fn test_generate_copy_sends_generation_config() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": { "topK": 40 }
            })))
            .respond_with(text_response(&["Subject: Hi\n", "Body: Let's talk"]))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server)
            .generate_email_copy("book demos", "VibeMail AI outreach")
            .await
            .unwrap();
        assert_eq!(text, "Subject: Hi\nBody: Let's talk");
    }

    #[tokio::test]
    async fn test_intent_request_has_no_generation_config() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(text_response(&["Interested - they asked for a call."]))
            .mount(&server)
            .await;

        let client = client(&server);
        let text = client.analyze_lead_intent("Can we chat?").await.unwrap();
        assert_eq!(text, "Interested - they asked for a call.");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("generationConfig").is_none());
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Reply: \"Can we chat?\""));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
            .mount(&server)
            .await;

        let err = client(&server).analyze_lead_intent("hi").await.unwrap_err();
        assert!(matches!(err, AssistantError::Status { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_empty_candidates_are_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = client(&server)
            .generate_email_copy("x", "y")
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::EmptyResponse));
    }
}
