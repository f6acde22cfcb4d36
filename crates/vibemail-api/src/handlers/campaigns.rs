//! Campaign handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use vibemail_common::types::CampaignStatus;
use vibemail_common::Error;
use vibemail_core::EmailDraft;
use vibemail_storage::models::{Campaign, CampaignStep, CreateCampaign};

use super::ListResponse;
use crate::error::{api_error, ApiError, ErrorResponse};
use crate::state::AppState;

/// Query parameters for listing campaigns
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCampaignsQuery {
    /// `draft`, `paused`, `running` or `completed`
    pub status: Option<String>,
}

/// Request body for creating a campaign
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    /// Defaults to "New Campaign"
    pub name: Option<String>,
    /// Defaults to 50
    pub total_leads: Option<u32>,
    /// Sequence steps; omitted means an empty sequence
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub steps: Vec<CampaignStep>,
}

/// Request body for replacing a campaign sequence
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStepsRequest {
    #[schema(value_type = Vec<Object>)]
    pub steps: Vec<CampaignStep>,
}

/// Request body for drafting the first email of a campaign
#[derive(Debug, Deserialize, ToSchema)]
pub struct DraftRequest {
    pub prompt: String,
}

/// List campaigns
#[utoipa::path(
    get,
    path = "/api/v1/campaigns",
    tag = "campaigns",
    params(ListCampaignsQuery),
    responses(
        (status = 200, description = "Campaigns, newest first"),
        (status = 422, description = "Unknown status filter", body = ErrorResponse)
    )
)]
pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCampaignsQuery>,
) -> Result<Json<ListResponse<Campaign>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<CampaignStatus>)
        .transpose()
        .map_err(|e| api_error(Error::Validation(e)))?;

    Ok(Json(ListResponse::new(state.campaigns.list(status).await)))
}

/// Create a campaign in draft
#[utoipa::path(
    post,
    path = "/api/v1/campaigns",
    tag = "campaigns",
    request_body = CreateCampaignRequest,
    responses(
        (status = 201, description = "Campaign created"),
        (status = 422, description = "Invalid campaign", body = ErrorResponse)
    )
)]
pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    let campaign = state
        .campaigns
        .create(CreateCampaign {
            name: req.name,
            total_leads: req.total_leads,
            steps: req.steps,
        })
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(campaign)))
}

/// Get a campaign
#[utoipa::path(
    get,
    path = "/api/v1/campaigns/{id}",
    tag = "campaigns",
    params(("id" = String, Path, description = "Campaign ID")),
    responses(
        (status = 200, description = "Campaign"),
        (status = 404, description = "Unknown campaign", body = ErrorResponse)
    )
)]
pub async fn get_campaign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    state.campaigns.get(&id).await.map(Json).map_err(api_error)
}

/// Replace the sequence of a campaign
#[utoipa::path(
    put,
    path = "/api/v1/campaigns/{id}/steps",
    tag = "campaigns",
    params(("id" = String, Path, description = "Campaign ID")),
    request_body = UpdateStepsRequest,
    responses(
        (status = 200, description = "Campaign with the new sequence"),
        (status = 422, description = "Invalid step", body = ErrorResponse),
        (status = 404, description = "Unknown campaign", body = ErrorResponse)
    )
)]
pub async fn update_steps(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStepsRequest>,
) -> Result<Json<Campaign>, ApiError> {
    state
        .campaigns
        .set_steps(&id, req.steps)
        .await
        .map(Json)
        .map_err(api_error)
}

/// Launch a paused campaign
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/{id}/launch",
    tag = "campaigns",
    params(("id" = String, Path, description = "Campaign ID")),
    responses(
        (status = 200, description = "Running campaign"),
        (status = 404, description = "Unknown campaign", body = ErrorResponse),
        (status = 409, description = "Campaign cannot be launched", body = ErrorResponse)
    )
)]
pub async fn launch_campaign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    state.campaigns.launch(&id).await.map(Json).map_err(api_error)
}

/// Pause a running campaign
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/{id}/pause",
    tag = "campaigns",
    params(("id" = String, Path, description = "Campaign ID")),
    responses(
        (status = 200, description = "Paused campaign"),
        (status = 404, description = "Unknown campaign", body = ErrorResponse),
        (status = 409, description = "Campaign cannot be paused", body = ErrorResponse)
    )
)]
pub async fn pause_campaign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    state.campaigns.pause(&id).await.map(Json).map_err(api_error)
}

/// Flip a campaign between running and paused
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/{id}/toggle",
    tag = "campaigns",
    params(("id" = String, Path, description = "Campaign ID")),
    responses(
        (status = 200, description = "Toggled campaign"),
        (status = 404, description = "Unknown campaign", body = ErrorResponse),
        (status = 409, description = "Draft and completed campaigns cannot be toggled", body = ErrorResponse)
    )
)]
pub async fn toggle_campaign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    state.campaigns.toggle(&id).await.map(Json).map_err(api_error)
}

/// Delete a campaign
#[utoipa::path(
    delete,
    path = "/api/v1/campaigns/{id}",
    tag = "campaigns",
    params(("id" = String, Path, description = "Campaign ID")),
    responses(
        (status = 204, description = "Campaign deleted"),
        (status = 404, description = "Unknown campaign", body = ErrorResponse)
    )
)]
pub async fn delete_campaign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.campaigns.delete(&id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Draft a first email with the AI assistant
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/draft",
    tag = "campaigns",
    request_body = DraftRequest,
    responses(
        (status = 200, description = "Subject and body"),
        (status = 422, description = "Empty prompt", body = ErrorResponse)
    )
)]
pub async fn draft_email(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<EmailDraft>, ApiError> {
    state
        .campaigns
        .draft_copy(&req.prompt)
        .await
        .map(Json)
        .map_err(api_error)
}
