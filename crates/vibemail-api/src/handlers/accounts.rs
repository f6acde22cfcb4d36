//! Sending account handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vibemail_common::types::{AccountStatus, Provider};
use vibemail_common::Error;
use vibemail_storage::models::{CreateAccount, EmailAccount};

use super::ListResponse;
use crate::error::{api_error, ApiError, ErrorResponse};
use crate::state::AppState;

/// Request body for connecting an account
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub email: String,
    /// `google`, `outlook` or `smtp`
    #[schema(value_type = String)]
    pub provider: Provider,
    /// Defaults to 50
    pub daily_limit: Option<u32>,
}

/// Request body for updating an account
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    /// `active`, `reconnect` or `disabled`
    #[schema(value_type = Option<String>)]
    pub status: Option<AccountStatus>,
    pub daily_limit: Option<u32>,
}

/// List sending accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    responses((status = 200, description = "All connected accounts"))
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Json<ListResponse<EmailAccount>> {
    Json(ListResponse::new(state.accounts.list().await))
}

/// Connect a sending account
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account connected"),
        (status = 422, description = "Invalid email or limit", body = ErrorResponse),
        (status = 409, description = "Email already connected", body = ErrorResponse)
    )
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<EmailAccount>), ApiError> {
    let account = state
        .accounts
        .add(CreateAccount {
            email: req.email,
            provider: req.provider,
            daily_limit: req.daily_limit,
        })
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Get an account
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}",
    tag = "accounts",
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account"),
        (status = 404, description = "Unknown account", body = ErrorResponse)
    )
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EmailAccount>, ApiError> {
    state.accounts.get(&id).await.map(Json).map_err(api_error)
}

/// Update account status and/or daily limit
#[utoipa::path(
    patch,
    path = "/api/v1/accounts/{id}",
    tag = "accounts",
    params(("id" = String, Path, description = "Account ID")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated account"),
        (status = 422, description = "Empty update or invalid limit", body = ErrorResponse),
        (status = 404, description = "Unknown account", body = ErrorResponse)
    )
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<Json<EmailAccount>, ApiError> {
    if req.status.is_none() && req.daily_limit.is_none() {
        return Err(api_error(Error::Validation(
            "Nothing to update".to_string(),
        )));
    }

    if let Some(limit) = req.daily_limit {
        state
            .accounts
            .set_daily_limit(&id, limit)
            .await
            .map_err(api_error)?;
    }
    if let Some(status) = req.status {
        state
            .accounts
            .set_status(&id, status)
            .await
            .map_err(api_error)?;
    }

    state.accounts.get(&id).await.map(Json).map_err(api_error)
}

/// Toggle warmup
#[utoipa::path(
    post,
    path = "/api/v1/accounts/{id}/warmup",
    tag = "accounts",
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account with flipped warmup flag"),
        (status = 404, description = "Unknown account", body = ErrorResponse)
    )
)]
pub async fn toggle_warmup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EmailAccount>, ApiError> {
    state
        .accounts
        .toggle_warmup(&id)
        .await
        .map(Json)
        .map_err(api_error)
}

/// Disconnect an account
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{id}",
    tag = "accounts",
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account removed"),
        (status = 404, description = "Unknown account", body = ErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.accounts.delete(&id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
