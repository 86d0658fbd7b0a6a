// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::pipeline::PipelineError;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream API error: {0}")]
    UpstreamApi(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message used when the upstream API answers 429.
    pub const UPSTREAM_RATE_LIMIT: &'static str = "Rate limit exceeded";
    /// Message used when the upstream API rejects our credentials.
    pub const UPSTREAM_AUTH_ERROR: &'static str = "Upstream credentials rejected";

    /// True if this error came from an upstream 429 response.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::UpstreamApi(msg) if msg == Self::UPSTREAM_RATE_LIMIT)
    }

    /// True if this error came from an upstream 401 response or a failed
    /// token refresh.
    pub fn is_auth_error(&self) -> bool {
        match self {
            AppError::UpstreamApi(msg) => {
                msg == Self::UPSTREAM_AUTH_ERROR || msg.contains("invalid_grant")
            }
            _ => false,
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::MalformedBatchInput(msg) => AppError::InvalidInput(msg),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::InvalidInput(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_input",
                Some(msg.clone()),
            ),
            AppError::UpstreamApi(msg) => {
                tracing::warn!(error = %msg, "Upstream API error");
                (StatusCode::BAD_GATEWAY, "upstream_error", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
