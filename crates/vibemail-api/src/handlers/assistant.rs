//! AI assistant handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use vibemail_common::Error;
use vibemail_core::assistant::{parse_draft, IntentAnalysis};

use crate::error::{api_error, ApiError, ErrorResponse};
use crate::state::AppState;

/// Request body for generating copy
#[derive(Debug, Deserialize, ToSchema)]
pub struct EmailCopyRequest {
    /// What the email should be about
    pub prompt: String,
}

/// Generated copy, raw and split
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmailCopyResponse {
    /// Text as returned by the backend
    pub text: String,
    pub subject: String,
    pub body: String,
}

/// Request body for classifying a reply
#[derive(Debug, Deserialize, ToSchema)]
pub struct LeadIntentRequest {
    pub reply: String,
}

/// Generate cold email copy
#[utoipa::path(
    post,
    path = "/api/v1/assistant/email-copy",
    tag = "assistant",
    request_body = EmailCopyRequest,
    responses(
        (status = 200, description = "Generated copy, or the fallback text", body = EmailCopyResponse),
        (status = 422, description = "Empty prompt", body = ErrorResponse)
    )
)]
pub async fn generate_email_copy(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EmailCopyRequest>,
) -> Result<Json<EmailCopyResponse>, ApiError> {
    if req.prompt.trim().is_empty() {
        return Err(api_error(Error::Validation(
            "Prompt must not be empty".to_string(),
        )));
    }

    let text = state.copywriter.generate_email_copy(&req.prompt).await;
    let draft = parse_draft(&text);

    Ok(Json(EmailCopyResponse {
        text,
        subject: draft.subject,
        body: draft.body,
    }))
}

/// Classify the intent of a lead reply
#[utoipa::path(
    post,
    path = "/api/v1/assistant/lead-intent",
    tag = "assistant",
    request_body = LeadIntentRequest,
    responses(
        (status = 200, description = "Intent analysis, or the neutral fallback"),
        (status = 422, description = "Empty reply", body = ErrorResponse)
    )
)]
pub async fn analyze_lead_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LeadIntentRequest>,
) -> Result<Json<IntentAnalysis>, ApiError> {
    if req.reply.trim().is_empty() {
        return Err(api_error(Error::Validation(
            "Reply must not be empty".to_string(),
        )));
    }

    Ok(Json(state.copywriter.analyze_lead_intent(&req.reply).await))
}
