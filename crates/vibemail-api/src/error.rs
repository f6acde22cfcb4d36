//! API error responses

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use vibemail_common::Error;

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Stable error code, e.g. `not_found`
    pub error: String,
    /// Human readable message
    pub message: String,
}

/// Handler error type
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Convert a domain error into a response. Server-side failures are logged
/// and reported without detail.
pub fn api_error(e: Error) -> ApiError {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!("Request failed: {}", e);
        "Internal server error".to_string()
    } else {
        e.to_string()
    };

    (
        status,
        Json(ErrorResponse {
            error: e.code().to_lowercase(),
            message,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_message() {
        let (status, Json(body)) = api_error(Error::NotFound("Campaign not found: 9".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "not_found");
        assert_eq!(body.message, "Not found: Campaign not found: 9");
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let (status, Json(body)) = api_error(Error::Storage("disk full at /var".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "storage_error");
        assert_eq!(body.message, "Internal server error");
    }
}
