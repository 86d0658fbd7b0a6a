// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Intervals.icu API client.
//!
//! Auth is HTTP basic with the literal username `API_KEY` and the
//! athlete's key as password. Date bounds are `YYYY-MM-DD` strings.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;

use super::upstream::{check_response_json, transport_error};
use crate::config::IntervalsCredentials;
use crate::error::AppError;

const PROVIDER: &str = "Intervals.icu";
const DEFAULT_BASE_URL: &str = "https://intervals.icu/api/v1";
const BASIC_AUTH_USER: &str = "API_KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Intervals.icu API client.
#[derive(Clone)]
pub struct IntervalsClient {
    http: reqwest::Client,
    base_url: String,
    athlete_id: String,
    api_key: String,
}

impl IntervalsClient {
    /// Create a client for one athlete.
    pub fn new(credentials: &IntervalsCredentials) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            athlete_id: credentials.athlete_id.clone(),
            api_key: credentials.api_key.clone(),
        })
    }

    /// Point the client at a different API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get the athlete's profile.
    pub async fn get_athlete(&self) -> Result<Value, AppError> {
        let url = format!("{}/athlete/{}", self.base_url, self.athlete_id);
        self.get_json(&url, &[]).await
    }

    /// List activities between two dates (inclusive, either bound optional).
    pub async fn get_activities(
        &self,
        oldest: Option<NaiveDate>,
        newest: Option<NaiveDate>,
    ) -> Result<Value, AppError> {
        let url = format!("{}/athlete/{}/activities", self.base_url, self.athlete_id);
        let activities = self.get_json(&url, &date_bounds(oldest, newest)).await?;
        tracing::debug!(
            athlete_id = %self.athlete_id,
            count = ?activities.as_array().map(Vec::len),
            "Fetched Intervals.icu activities"
        );
        Ok(activities)
    }

    /// Activities from the last `weeks` weeks up to `now`.
    pub async fn get_recent_activities(
        &self,
        weeks: u32,
        now: DateTime<Utc>,
    ) -> Result<Value, AppError> {
        let oldest = now - chrono::Duration::weeks(i64::from(weeks));
        self.get_activities(Some(oldest.date_naive()), Some(now.date_naive()))
            .await
    }

    /// Get a single activity with full details.
    pub async fn get_activity(&self, activity_id: &str) -> Result<Value, AppError> {
        let url = format!("{}/activity/{}", self.base_url, activity_id);
        self.get_json(&url, &[]).await
    }

    /// Wellness entries (weight, sleep, HRV, ...) between two dates.
    pub async fn get_wellness(
        &self,
        oldest: Option<NaiveDate>,
        newest: Option<NaiveDate>,
    ) -> Result<Value, AppError> {
        let url = format!("{}/athlete/{}/wellness", self.base_url, self.athlete_id);
        self.get_json(&url, &date_bounds(oldest, newest)).await
    }

    /// Fitness, fatigue and form (CTL/ATL/TSB) between two dates.
    pub async fn get_fitness(
        &self,
        oldest: Option<NaiveDate>,
        newest: Option<NaiveDate>,
    ) -> Result<Value, AppError> {
        let url = format!("{}/athlete/{}/fitness", self.base_url, self.athlete_id);
        self.get_json(&url, &date_bounds(oldest, newest)).await
    }

    /// Authenticated GET with JSON response.
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, AppError> {
        let response = self
            .http
            .get(url)
            .basic_auth(BASIC_AUTH_USER, Some(&self.api_key))
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        check_response_json(PROVIDER, response).await
    }
}

/// `oldest`/`newest` query pairs for the bounds that are set.
fn date_bounds(
    oldest: Option<NaiveDate>,
    newest: Option<NaiveDate>,
) -> Vec<(&'static str, String)> {
    [("oldest", oldest), ("newest", newest)]
        .into_iter()
        .filter_map(|(key, date)| date.map(|d| (key, d.format("%Y-%m-%d").to_string())))
        .collect()
}
