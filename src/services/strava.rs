// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching athlete activities.
//!
//! Handles:
//! - Access token refresh from a long-lived refresh token
//! - Paginated activity listing within a date window
//! - Rate limit and auth failure detection

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

use super::upstream::{check_response_json, transport_error};
use crate::config::StravaCredentials;
use crate::error::AppError;

const PROVIDER: &str = "Strava";
const DEFAULT_BASE_URL: &str = "https://www.strava.com/api/v3";
const DEFAULT_TOKEN_URL: &str = "https://www.strava.com/oauth/token";
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Page size used when walking all activities.
pub const PAGE_SIZE: u32 = 200;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Access token with expiry, plus the refresh token to use next.
///
/// Strava may rotate the refresh token on every exchange.
struct TokenState {
    access_token: Option<String>,
    expires_at: DateTime<Utc>,
    refresh_token: String,
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    tokens: Arc<Mutex<TokenState>>,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(credentials: &StravaCredentials) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            tokens: Arc::new(Mutex::new(TokenState {
                access_token: None,
                expires_at: DateTime::<Utc>::MIN_UTC,
                refresh_token: credentials.refresh_token.clone(),
            })),
        })
    }

    /// Point the client at a different API root and token endpoint (used by
    /// tests).
    pub fn with_urls(mut self, base_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.token_url = token_url.into();
        self
    }

    // ─── Token Management ────────────────────────────────────────────────────

    /// Get a valid (non-expired) access token, refreshing if needed.
    ///
    /// The lock is held across the refresh so concurrent callers wait for a
    /// single exchange instead of racing with the same refresh token.
    pub async fn get_valid_access_token(&self) -> Result<String, AppError> {
        let mut tokens = self.tokens.lock().await;
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);

        if let Some(access_token) = &tokens.access_token {
            if Utc::now() + margin < tokens.expires_at {
                return Ok(access_token.clone());
            }
        }

        tracing::info!("Strava access token missing or expired, refreshing");
        let refreshed = self.refresh_token(&tokens.refresh_token).await?;

        tokens.expires_at = DateTime::from_timestamp(refreshed.expires_at, 0).unwrap_or_default();
        tokens.refresh_token = refreshed.refresh_token;
        tokens.access_token = Some(refreshed.access_token.clone());

        tracing::info!(expires_at = %tokens.expires_at, "Strava token refreshed");
        Ok(refreshed.access_token)
    }

    /// Exchange the refresh token for a new access token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::UpstreamApi(format!("Token refresh request failed: {}", e)))?;

        check_response_json(PROVIDER, response).await
    }

    // ─── API Wrappers ────────────────────────────────────────────────────────

    /// Get authenticated athlete profile.
    pub async fn get_athlete(&self) -> Result<Value, AppError> {
        let url = format!("{}/athlete", self.base_url);
        self.get_json(&url, &[]).await
    }

    /// Get an athlete's recent, year-to-date and all-time totals.
    pub async fn get_athlete_stats(&self, athlete_id: u64) -> Result<Value, AppError> {
        let url = format!("{}/athletes/{}/stats", self.base_url, athlete_id);
        self.get_json(&url, &[]).await
    }

    /// Get one page of the athlete's activities.
    pub async fn get_activities(
        &self,
        page: u32,
        per_page: u32,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Value>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let mut query = vec![
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(after) = after {
            query.push(("after", after.timestamp().to_string()));
        }
        if let Some(before) = before {
            query.push(("before", before.timestamp().to_string()));
        }

        self.get_json(&url, &query).await
    }

    /// Fetch all activities in the window, paginating until an empty page.
    pub async fn get_all_activities(
        &self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Value>, AppError> {
        let mut all_activities = Vec::new();
        let mut page = 1;

        loop {
            let activities = self.get_activities(page, PAGE_SIZE, after, before).await?;
            if activities.is_empty() {
                break;
            }
            tracing::debug!(page, count = activities.len(), "Fetched Strava activity page");
            all_activities.extend(activities);
            page += 1;
        }

        Ok(all_activities)
    }

    /// Activities from the last `weeks` weeks up to `now`.
    pub async fn get_recent_activities(
        &self,
        weeks: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Value>, AppError> {
        let after = now - Duration::weeks(i64::from(weeks));
        self.get_all_activities(Some(after), None).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let access_token = self.get_valid_access_token().await?;

        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        check_response_json(PROVIDER, response).await
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}
