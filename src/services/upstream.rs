// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Response handling shared by the upstream API clients.

use crate::error::AppError;
use serde::Deserialize;

/// Map a transport failure (connect error, timeout) to an upstream error.
pub fn transport_error(provider: &str, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::UpstreamApi(format!("{} request timed out", provider))
    } else {
        AppError::UpstreamApi(format!("{} request failed: {}", provider, err))
    }
}

/// Check response status and parse the JSON body.
///
/// Any non-2xx status is a hard failure; retrying is left to the caller.
pub async fn check_response_json<T: for<'de> Deserialize<'de>>(
    provider: &str,
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!(provider, "Upstream rate limit hit (429)");
            return Err(AppError::UpstreamApi(
                AppError::UPSTREAM_RATE_LIMIT.to_string(),
            ));
        }

        if status.as_u16() == 401 {
            tracing::warn!(provider, "Upstream rejected credentials (401)");
            return Err(AppError::UpstreamApi(
                AppError::UPSTREAM_AUTH_ERROR.to_string(),
            ));
        }

        tracing::warn!(provider, status = %status, "Upstream request failed");
        return Err(AppError::UpstreamApi(format!(
            "{} HTTP {}: {}",
            provider, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::UpstreamApi(format!("{} JSON parse error: {}", provider, e)))
}
