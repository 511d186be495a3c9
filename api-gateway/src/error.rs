//! Error handling for the API gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error information
    pub error: ErrorInfo,
    /// Request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Detailed error information
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code (string identifier for the error type)
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Common error: {0}")]
    Common(#[from] common::error::Error),
}

impl ApiError {
    /// HTTP status and error code for this error
    fn classify(&self) -> (StatusCode, &'static str) {
        use common::error::Error;

        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Common(e) => match e {
                // Client errors (4xx)
                Error::AccountNotFound(_) => (StatusCode::NOT_FOUND, "account_not_found"),
                Error::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),

                // Server errors (5xx)
                Error::ConfigurationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error"),
                Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
                Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
                Error::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "migration_error"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Generate a request ID for tracking errors
        let request_id = Uuid::new_v4().to_string();

        let (status, code) = self.classify();
        if status.is_server_error() {
            tracing::error!("API Error [{}]: {:?}", request_id, &self);
        } else {
            tracing::debug!("API Error [{}]: {}", request_id, &self);
        }

        let details = match &self {
            ApiError::Common(common::error::Error::Database(e)) => Some(serde_json::json!({
                "code": e.as_database_error().and_then(|dbe| dbe.code().map(|c| c.to_string())),
            })),
            _ => None,
        };

        let error_response = ErrorResponse {
            error: ErrorInfo {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
            request_id: Some(request_id),
        };

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::Error;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(Error::AccountNotFound("1".to_string()));
        assert_eq!(not_found.classify(), (StatusCode::NOT_FOUND, "account_not_found"));

        let invalid = ApiError::from(Error::ValidationError("bad".to_string()));
        assert_eq!(invalid.classify().0, StatusCode::BAD_REQUEST);

        let internal = ApiError::from(Error::Internal("boom".to_string()));
        assert_eq!(internal.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
