// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Weekly and monthly rollups.
//!
//! Rows are computed fresh from whatever batch the caller hands in and
//! are never stored.

use chrono::NaiveDateTime;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Totals and means for one calendar bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PeriodStats {
    pub total_distance_km: f64,
    pub total_distance_miles: f64,
    pub total_moving_time_min: f64,
    /// Elevation gain in meters
    pub total_elevation_m: f64,
    pub activity_count: u32,
    /// Mean pace over activities with a defined pace only
    pub avg_pace: Option<f64>,
    /// Mean speed over activities with a defined speed only
    pub avg_speed_kmh: Option<f64>,
}

/// One row per ISO week present in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklySummary {
    pub week_start: NaiveDateTime,
    #[serde(flatten)]
    pub stats: PeriodStats,
}

/// One row per `YYYY-MM` month present in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthlySummary {
    pub month: String,
    #[serde(flatten)]
    pub stats: PeriodStats,
}
