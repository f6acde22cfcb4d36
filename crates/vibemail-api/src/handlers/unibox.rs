//! Unibox handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use vibemail_common::types::ThreadStatus;
use vibemail_common::Error;
use vibemail_core::assistant::IntentAnalysis;
use vibemail_core::ThreadQuery;
use vibemail_storage::models::MessageThread;

use super::ListResponse;
use crate::error::{api_error, ApiError, ErrorResponse};
use crate::state::AppState;

/// Query parameters for listing threads
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListThreadsQuery {
    /// `unread`, `read` or `replied`
    pub status: Option<String>,
    /// Matches lead name, lead email or campaign name
    pub search: Option<String>,
}

/// List inbox threads
#[utoipa::path(
    get,
    path = "/api/v1/unibox",
    tag = "unibox",
    params(ListThreadsQuery),
    responses(
        (status = 200, description = "Matching threads"),
        (status = 422, description = "Unknown status filter", body = ErrorResponse)
    )
)]
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListThreadsQuery>,
) -> Result<Json<ListResponse<MessageThread>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ThreadStatus>)
        .transpose()
        .map_err(|e| api_error(Error::Validation(e)))?;

    let threads = state.unibox.list(&ThreadQuery {
        status,
        search: query.search,
    });
    Ok(Json(ListResponse::new(threads)))
}

/// Get a thread
#[utoipa::path(
    get,
    path = "/api/v1/unibox/{id}",
    tag = "unibox",
    params(("id" = String, Path, description = "Thread ID")),
    responses(
        (status = 200, description = "Thread"),
        (status = 404, description = "Unknown thread", body = ErrorResponse)
    )
)]
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageThread>, ApiError> {
    state.unibox.get(&id).map(Json).map_err(api_error)
}

/// Classify the intent of a thread's last message
#[utoipa::path(
    post,
    path = "/api/v1/unibox/{id}/analyze",
    tag = "unibox",
    params(("id" = String, Path, description = "Thread ID")),
    responses(
        (status = 200, description = "Intent analysis"),
        (status = 404, description = "Unknown thread", body = ErrorResponse)
    )
)]
pub async fn analyze_thread(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<IntentAnalysis>, ApiError> {
    state.unibox.analyze(&id).await.map(Json).map_err(api_error)
}
