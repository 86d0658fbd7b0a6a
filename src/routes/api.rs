// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard API routes.

use crate::config::{MAX_WEEKS, MIN_WEEKS};
use crate::error::{AppError, Result};
use crate::models::EnrichedActivity;
use crate::pipeline::normalize::SkippedRecord;
use crate::pipeline::{process_batch, ProcessedBatch, TypeFilter};
use crate::services::dashboard::{build_dashboard, Dashboard, DashboardQuery, DistanceUnit};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Source label reported for batches posted by the caller.
const REQUEST_SOURCE: &str = "request";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/activities", get(get_activities))
        .route("/api/pipeline", post(run_pipeline))
}

// ─── Query Parameters ────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
pub struct DashboardParams {
    /// Lookback window; the configured default when absent
    #[validate(range(min = MIN_WEEKS, max = MAX_WEEKS))]
    pub weeks: Option<u32>,
    /// "All", a family ("Run", "Ride") or any raw type label
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    /// "km" or "miles"
    pub unit: Option<String>,
}

impl DashboardParams {
    fn into_query(self, default_weeks: u32) -> Result<DashboardQuery> {
        self.validate().map_err(|_| {
            AppError::BadRequest(format!(
                "'weeks' must be between {} and {}",
                MIN_WEEKS, MAX_WEEKS
            ))
        })?;

        let unit = match self.unit.as_deref() {
            Some(raw) => raw.parse::<DistanceUnit>().map_err(AppError::BadRequest)?,
            None => DistanceUnit::default(),
        };

        Ok(DashboardQuery {
            weeks: self.weeks.unwrap_or(default_weeks),
            filter: TypeFilter::parse(self.activity_type.as_deref().unwrap_or_default()),
            unit,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ActivitiesParams {
    #[validate(range(min = MIN_WEEKS, max = MAX_WEEKS))]
    pub weeks: Option<u32>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
}

// ─── Responses ───────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardResponse {
    /// "intervals", "strava", "sample" or "request"
    pub source: String,
    pub using_sample_data: bool,
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub skipped_records: Vec<SkippedRecord>,
    #[serde(flatten)]
    pub dashboard: Dashboard,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    pub source: String,
    pub using_sample_data: bool,
    pub weeks: u32,
    pub activities: Vec<EnrichedActivity>,
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub skipped_records: Vec<SkippedRecord>,
}

// ─── Handlers ────────────────────────────────────────────────

/// Fetch the configured source's recent activities and run them through
/// the pipeline.
async fn load_batch(state: &AppState, weeks: u32) -> Result<ProcessedBatch> {
    let raw = state.source.fetch_recent(weeks).await?;

    // A non-list answer here is the upstream's fault, not the caller's.
    process_batch(&raw).map_err(|e| {
        AppError::UpstreamApi(format!(
            "{} returned unusable data: {}",
            state.source.label(),
            e
        ))
    })
}

/// Dashboard for the configured activity source.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardResponse>> {
    let query = params.into_query(state.config.default_weeks)?;
    tracing::debug!(
        weeks = query.weeks,
        filter = query.filter.as_str(),
        unit = query.unit.label(),
        source = state.source.label(),
        "Building dashboard"
    );

    let batch = load_batch(&state, query.weeks).await?;
    if batch.activities.is_empty() {
        tracing::info!(weeks = query.weeks, "No activities in window");
    }

    Ok(Json(DashboardResponse {
        source: state.source.label().to_string(),
        using_sample_data: state.source.is_sample(),
        dashboard: build_dashboard(&batch.activities, &query),
        skipped_records: batch.skipped,
    }))
}

/// Enriched activities for the configured source, optionally filtered by
/// type.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivitiesParams>,
) -> Result<Json<ActivitiesResponse>> {
    params.validate().map_err(|_| {
        AppError::BadRequest(format!(
            "'weeks' must be between {} and {}",
            MIN_WEEKS, MAX_WEEKS
        ))
    })?;

    let weeks = params.weeks.unwrap_or(state.config.default_weeks);
    let filter = TypeFilter::parse(params.activity_type.as_deref().unwrap_or_default());
    tracing::debug!(weeks, filter = filter.as_str(), "Fetching activities");

    let batch = load_batch(&state, weeks).await?;
    let activities = filter.apply(&batch.activities).into_iter().cloned().collect();

    Ok(Json(ActivitiesResponse {
        source: state.source.label().to_string(),
        using_sample_data: state.source.is_sample(),
        weeks,
        activities,
        skipped_records: batch.skipped,
    }))
}

/// Dashboard for a batch supplied in the request body.
///
/// The body is read as raw bytes so that malformed input maps to 422
/// rather than the extractor's own rejection.
async fn run_pipeline(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
    body: Bytes,
) -> Result<Json<DashboardResponse>> {
    let query = params.into_query(state.config.default_weeks)?;

    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidInput(format!("Body is not valid JSON: {}", e)))?;
    let batch = process_batch(&raw)?;

    tracing::debug!(
        activities = batch.activities.len(),
        skipped = batch.skipped.len(),
        "Processed posted batch"
    );

    Ok(Json(DashboardResponse {
        source: REQUEST_SOURCE.to_string(),
        using_sample_data: false,
        dashboard: build_dashboard(&batch.activities, &query),
        skipped_records: batch.skipped,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        weeks: Option<u32>,
        activity_type: Option<&str>,
        unit: Option<&str>,
    ) -> DashboardParams {
        DashboardParams {
            weeks,
            activity_type: activity_type.map(str::to_string),
            unit: unit.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults() {
        let query = DashboardParams::default().into_query(12).unwrap();
        assert_eq!(query.weeks, 12);
        assert_eq!(query.filter, TypeFilter::All);
        assert_eq!(query.unit, DistanceUnit::Km);
    }

    #[test]
    fn test_weeks_bounds() {
        assert!(params(Some(MIN_WEEKS), None, None).into_query(12).is_ok());
        assert!(params(Some(MAX_WEEKS), None, None).into_query(12).is_ok());

        let err = params(Some(MIN_WEEKS - 1), None, None)
            .into_query(12)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = params(Some(MAX_WEEKS + 1), None, None)
            .into_query(12)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_unit_and_type() {
        let query = params(None, Some("Ride"), Some("miles"))
            .into_query(12)
            .unwrap();
        assert_eq!(query.unit, DistanceUnit::Miles);
        assert_eq!(query.filter, TypeFilter::Label("Ride".to_string()));

        let err = params(None, None, Some("yards")).into_query(12).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
