// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity records at each stage of the pipeline.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One activity exactly as an upstream provider returned it.
///
/// Field names and units vary by provider; nothing is guaranteed to be
/// present.
pub type RawActivityRecord = serde_json::Map<String, serde_json::Value>;

/// Provider-independent activity record.
///
/// Numeric totals default to 0 when the provider omits them. Sensor
/// readings (power, speed, heart rate) stay `None` when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NormalizedActivity {
    /// Provider activity ID (unique within a batch)
    pub id: String,
    /// Activity name/title (may be empty)
    pub name: String,
    /// Raw activity type label (Run, Ride, VirtualRide, Hike, ...)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Start instant
    pub start_date: DateTime<Utc>,
    /// Start as the athlete's wall clock read it
    pub start_date_local: NaiveDateTime,
    pub distance_m: f64,
    pub moving_time_s: f64,
    pub elapsed_time_s: f64,
    pub elevation_gain_m: f64,
    pub average_watts: Option<f64>,
    pub weighted_average_watts: Option<f64>,
    pub max_speed_m_s: Option<f64>,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
}

/// Normalized activity plus unit conversions, pace/speed and calendar
/// buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EnrichedActivity {
    #[serde(flatten)]
    pub activity: NormalizedActivity,
    pub distance_km: f64,
    pub distance_miles: f64,
    pub moving_time_min: f64,
    pub elapsed_time_min: f64,
    pub elevation_gain_ft: f64,
    /// `None` when the activity has no distance
    pub pace_min_per_km: Option<f64>,
    /// `None` when the activity has no moving time
    pub speed_kmh: Option<f64>,
    pub iso_week: u32,
    pub iso_year: i32,
    /// Midnight on the Monday of the ISO week
    pub week_start: NaiveDateTime,
    /// `YYYY-MM`
    pub month: String,
    /// Full weekday name (e.g. "Tuesday")
    pub day_of_week: String,
}

impl EnrichedActivity {
    pub fn name(&self) -> &str {
        &self.activity.name
    }

    pub fn activity_type(&self) -> &str {
        &self.activity.activity_type
    }

    pub fn start_date_local(&self) -> NaiveDateTime {
        self.activity.start_date_local
    }
}
