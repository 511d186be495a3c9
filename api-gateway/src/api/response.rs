//! Response bodies that are not plain JSON resources

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::model::account::TransactionOutcome;
use serde::Serialize;
use utoipa::ToSchema;

/// Body returned when a transaction was applied
pub const SUCCESS: &str = "SUCCESS";
/// Body returned when a transaction was rejected
pub const FAILED: &str = "FAILED";

/// Plain-text reply to a balance transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionReply {
    /// 200 `SUCCESS`
    Success,
    /// 417 `FAILED`
    Failed,
}

impl From<TransactionOutcome> for TransactionReply {
    fn from(outcome: TransactionOutcome) -> Self {
        if outcome.is_success() {
            TransactionReply::Success
        } else {
            TransactionReply::Failed
        }
    }
}

impl IntoResponse for TransactionReply {
    fn into_response(self) -> Response {
        match self {
            TransactionReply::Success => (StatusCode::OK, SUCCESS).into_response(),
            TransactionReply::Failed => (StatusCode::EXPECTATION_FAILED, FAILED).into_response(),
        }
    }
}

/// Liveness probe body
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
}

impl HealthResponse {
    /// Healthy response for the running binary
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
