// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-activity derived metrics.

use chrono::{Datelike, NaiveTime};

use crate::models::{EnrichedActivity, NormalizedActivity};
use crate::time_utils::{iso_week_start, month_key};

pub const METERS_PER_KM: f64 = 1000.0;
pub const METERS_PER_MILE: f64 = 1609.34;
pub const FEET_PER_METER: f64 = 3.28084;
/// Multiply m/s by this to get km/h.
pub const MPS_TO_KMH: f64 = 3.6;

/// Minutes per kilometer, `None` without distance.
pub fn pace_min_per_km(moving_time_s: f64, distance_km: f64) -> Option<f64> {
    (distance_km > 0.0).then(|| (moving_time_s / 60.0) / distance_km)
}

/// Average speed in km/h, `None` without moving time.
pub fn speed_kmh(distance_km: f64, moving_time_s: f64) -> Option<f64> {
    (moving_time_s > 0.0).then(|| distance_km / (moving_time_s / 3600.0))
}

/// Derive unit conversions, pace, speed and calendar buckets.
pub fn enrich(activity: NormalizedActivity) -> EnrichedActivity {
    let distance_km = activity.distance_m / METERS_PER_KM;
    let local = activity.start_date_local;
    let iso = local.iso_week();

    EnrichedActivity {
        distance_km,
        distance_miles: activity.distance_m / METERS_PER_MILE,
        moving_time_min: activity.moving_time_s / 60.0,
        elapsed_time_min: activity.elapsed_time_s / 60.0,
        elevation_gain_ft: activity.elevation_gain_m * FEET_PER_METER,
        pace_min_per_km: pace_min_per_km(activity.moving_time_s, distance_km),
        speed_kmh: speed_kmh(distance_km, activity.moving_time_s),
        iso_week: iso.week(),
        iso_year: iso.year(),
        // Normalization rejects dates whose Monday is unrepresentable.
        week_start: iso_week_start(local).unwrap_or_else(|| local.date().and_time(NaiveTime::MIN)),
        month: month_key(local),
        day_of_week: local.format("%A").to_string(),
        activity,
    }
}

/// Enrich every activity, preserving order.
pub fn enrich_all(activities: Vec<NormalizedActivity>) -> Vec<EnrichedActivity> {
    activities.into_iter().map(enrich).collect()
}
