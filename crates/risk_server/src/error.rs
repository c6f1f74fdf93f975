//! API error responses
//!
//! Every failure leaves the server as `{ "code", "message", "details"? }`
//! with a matching HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use risk_engine::SimulationError;
use serde::Serialize;
use serde_json::json;

/// Standard API error response.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// HTTP status sent with the body
    #[serde(skip)]
    pub status: StatusCode,
    /// Error code (e.g. "INVALID_PARAMETER", "QUOTA_EXCEEDED")
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Rejected simulation parameter (400).
    pub fn invalid_parameter(parameter: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETER", message)
            .with_details(json!({ "parameter": parameter }))
    }

    /// Request exceeds the path cell quota (413).
    pub fn quota_exceeded(requested: usize, limit: usize) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "QUOTA_EXCEEDED",
            format!(
                "Requested {} path cells, limit is {}; reduce num_simulations or days",
                requested, limit
            ),
        )
        .with_details(json!({ "requested": requested, "limit": limit }))
    }

    /// Simulation could not complete (500).
    pub fn computation_failed(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "COMPUTATION_FAILED",
            message,
        )
    }
}

impl From<SimulationError> for ApiError {
    fn from(err: SimulationError) -> Self {
        Self::invalid_parameter(err.parameter(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
