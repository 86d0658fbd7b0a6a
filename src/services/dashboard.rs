// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard view assembled from an enriched batch.
//!
//! Everything is recomputed per request from the batch handed in.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{EnrichedActivity, MonthlySummary, PersonalBests, WeeklySummary};
use crate::pipeline::aggregate::{monthly_summary, weekly_summary};
use crate::pipeline::classify::{filter_by_family, ActivityFamily};
use crate::pipeline::format::format_pace;
use crate::pipeline::personal_bests::get_personal_bests;
use crate::pipeline::TypeFilter;
use crate::time_utils::format_display_datetime;

/// Rows shown in the recent activities table.
pub const RECENT_LIMIT: usize = 20;

/// Distance unit for totals and tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Km,
    Miles,
}

impl DistanceUnit {
    /// Short label used next to values ("km", "mi").
    pub fn label(&self) -> &'static str {
        match self {
            DistanceUnit::Km => "km",
            DistanceUnit::Miles => "mi",
        }
    }

    pub fn of(&self, activity: &EnrichedActivity) -> f64 {
        match self {
            DistanceUnit::Km => activity.distance_km,
            DistanceUnit::Miles => activity.distance_miles,
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "km" => Ok(DistanceUnit::Km),
            "miles" => Ok(DistanceUnit::Miles),
            other => Err(format!("Unknown distance unit '{}' (expected km or miles)", other)),
        }
    }
}

/// What the caller asked to see.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardQuery {
    /// Lookback window in weeks, used for per-week averages
    pub weeks: u32,
    pub filter: TypeFilter,
    pub unit: DistanceUnit,
}

/// Headline totals over the filtered activities.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Overview {
    /// Total distance in the selected unit
    pub total_distance: f64,
    pub total_moving_hours: f64,
    pub activity_count: u32,
    pub total_elevation_m: f64,
    /// Total distance divided by the window length
    pub avg_distance_per_week: f64,
    pub unit_label: String,
}

/// Activity count and distance for one raw type label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TypeBreakdownRow {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub count: u32,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum TrendMetric {
    /// Minutes per km (lower is faster)
    Pace,
    /// km/h
    Speed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrendPoint {
    pub date: NaiveDateTime,
    pub value: f64,
    pub name: String,
    pub distance_km: f64,
}

/// Per-activity pace or speed over time, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrendSeries {
    pub metric: TrendMetric,
    pub points: Vec<TrendPoint>,
}

/// One row of the recent activities table, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecentActivityRow {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    /// `DD Mon YYYY HH:MM`
    pub date: String,
    /// In the selected unit, one decimal
    pub distance: f64,
    pub time_min: i64,
    pub elevation_m: i64,
    /// `m:ss` per km, or `--:--`
    pub pace: String,
    pub speed_kmh: Option<f64>,
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Dashboard {
    pub weeks: u32,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub filter: TypeFilter,
    pub unit: DistanceUnit,
    /// True when no activity passes the filter
    pub empty: bool,
    pub overview: Overview,
    pub weekly: Vec<WeeklySummary>,
    pub monthly: Vec<MonthlySummary>,
    pub trend: Option<TrendSeries>,
    /// Over the whole batch, regardless of filter
    pub type_breakdown: Vec<TypeBreakdownRow>,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, PersonalBest>"))]
    pub personal_bests: PersonalBests,
    pub recent_activities: Vec<RecentActivityRow>,
}

/// Build the dashboard for `query` from an enriched batch.
///
/// An empty batch (or a filter that matches nothing) is a valid result
/// with empty sections.
pub fn build_dashboard(activities: &[EnrichedActivity], query: &DashboardQuery) -> Dashboard {
    let filtered = query.filter.apply(activities);

    Dashboard {
        weeks: query.weeks,
        filter: query.filter.clone(),
        unit: query.unit,
        empty: filtered.is_empty(),
        overview: overview(&filtered, query),
        weekly: weekly_summary(filtered.iter().copied()),
        monthly: monthly_summary(filtered.iter().copied()),
        trend: trend(&filtered, &query.filter),
        type_breakdown: type_breakdown(activities),
        personal_bests: get_personal_bests(activities, &query.filter),
        recent_activities: recent_activities(&filtered, query.unit),
    }
}

fn overview(filtered: &[&EnrichedActivity], query: &DashboardQuery) -> Overview {
    let total_distance: f64 = filtered.iter().map(|a| query.unit.of(a)).sum();
    let total_moving_min: f64 = filtered.iter().map(|a| a.moving_time_min).sum();
    let total_elevation_m: f64 = filtered.iter().map(|a| a.activity.elevation_gain_m).sum();

    Overview {
        total_distance,
        total_moving_hours: total_moving_min / 60.0,
        activity_count: filtered.len() as u32,
        total_elevation_m,
        avg_distance_per_week: total_distance / f64::from(query.weeks.max(1)),
        unit_label: query.unit.label().to_string(),
    }
}

/// Pace for runs when the filter allows runs and there are any, else
/// speed for rides.
fn trend(filtered: &[&EnrichedActivity], filter: &TypeFilter) -> Option<TrendSeries> {
    if filter.enables(ActivityFamily::Run) {
        let runs = filter_by_family(filtered.iter().copied(), ActivityFamily::Run);
        if !runs.is_empty() {
            return Some(series(runs, TrendMetric::Pace, |a| a.pace_min_per_km));
        }
    }

    if filter.enables(ActivityFamily::Ride) {
        let rides = filter_by_family(filtered.iter().copied(), ActivityFamily::Ride);
        if !rides.is_empty() {
            return Some(series(rides, TrendMetric::Speed, |a| a.speed_kmh));
        }
    }

    None
}

fn series<F>(mut activities: Vec<&EnrichedActivity>, metric: TrendMetric, value: F) -> TrendSeries
where
    F: Fn(&EnrichedActivity) -> Option<f64>,
{
    activities.sort_by_key(|a| a.start_date_local());

    let points = activities
        .into_iter()
        .filter_map(|a| {
            value(a).map(|v| TrendPoint {
                date: a.start_date_local(),
                value: v,
                name: a.name().to_string(),
                distance_km: a.distance_km,
            })
        })
        .collect();

    TrendSeries { metric, points }
}

fn type_breakdown(activities: &[EnrichedActivity]) -> Vec<TypeBreakdownRow> {
    let mut by_type: BTreeMap<&str, (u32, f64)> = BTreeMap::new();
    for activity in activities {
        let entry = by_type.entry(activity.activity_type()).or_default();
        entry.0 += 1;
        entry.1 += activity.distance_km;
    }

    by_type
        .into_iter()
        .map(|(activity_type, (count, distance_km))| TypeBreakdownRow {
            activity_type: activity_type.to_string(),
            count,
            distance_km,
        })
        .collect()
}

fn recent_activities(filtered: &[&EnrichedActivity], unit: DistanceUnit) -> Vec<RecentActivityRow> {
    let mut recent: Vec<&EnrichedActivity> = filtered.to_vec();
    // Stable sort keeps input order among equal start times.
    recent.sort_by(|a, b| b.start_date_local().cmp(&a.start_date_local()));

    recent
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|a| RecentActivityRow {
            id: a.activity.id.clone(),
            name: a.name().to_string(),
            activity_type: a.activity_type().to_string(),
            date: format_display_datetime(a.start_date_local()),
            distance: round_1dp(unit.of(a)),
            time_min: a.moving_time_min.round() as i64,
            elevation_m: a.activity.elevation_gain_m.round() as i64,
            pace: format_pace(a.pace_min_per_km),
            speed_kmh: a.speed_kmh.map(round_1dp),
        })
        .collect()
}

fn round_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonalBestCategory;
    use crate::pipeline::process_batch;
    use serde_json::{json, Value};

    fn enriched(raw: Value) -> Vec<EnrichedActivity> {
        process_batch(&raw).unwrap().activities
    }

    fn query(filter: &str, unit: DistanceUnit) -> DashboardQuery {
        DashboardQuery {
            weeks: 4,
            filter: TypeFilter::parse(filter),
            unit,
        }
    }

    fn mixed_batch() -> Vec<EnrichedActivity> {
        enriched(json!([
            {"id": 1, "name": "Easy", "type": "Run", "start_date_local": "2024-03-05T07:00:00Z",
             "distance": 10000.0, "moving_time": 2700, "total_elevation_gain": 40.0},
            {"id": 2, "name": "Commute", "type": "Ride", "start_date_local": "2024-03-06T08:00:00Z",
             "distance": 30000.0, "moving_time": 3600, "total_elevation_gain": 150.0,
             "average_watts": 200.0},
            {"id": 3, "name": "Tempo", "type": "Run", "start_date_local": "2024-03-07T07:00:00Z",
             "distance": 5000.0, "moving_time": 1200, "total_elevation_gain": 10.0},
            {"id": 4, "name": "Zwift", "type": "VirtualRide", "start_date_local": "2024-03-12T18:30:00Z",
             "distance": 25000.0, "moving_time": 2700},
            {"id": 5, "name": "Walk", "type": "Walk", "start_date_local": "2024-03-13T12:00:00Z",
             "distance": 3000.0, "moving_time": 2400},
        ]))
    }

    #[test]
    fn test_distance_unit_parse() {
        assert_eq!("km".parse::<DistanceUnit>(), Ok(DistanceUnit::Km));
        assert_eq!("miles".parse::<DistanceUnit>(), Ok(DistanceUnit::Miles));
        assert!("furlongs".parse::<DistanceUnit>().is_err());
        assert_eq!(DistanceUnit::Miles.label(), "mi");
    }

    #[test]
    fn test_overview_all() {
        let activities = mixed_batch();
        let dashboard = build_dashboard(&activities, &query("All", DistanceUnit::Km));

        assert!(!dashboard.empty);
        let overview = &dashboard.overview;
        assert_eq!(overview.activity_count, 5);
        assert!((overview.total_distance - 73.0).abs() < 1e-9);
        assert!((overview.avg_distance_per_week - 73.0 / 4.0).abs() < 1e-9);
        assert!((overview.total_moving_hours - 12600.0 / 3600.0).abs() < 1e-9);
        assert_eq!(overview.total_elevation_m, 200.0);
        assert_eq!(overview.unit_label, "km");
    }

    #[test]
    fn test_filter_run_family() {
        let activities = mixed_batch();
        let dashboard = build_dashboard(&activities, &query("Run", DistanceUnit::Miles));

        assert_eq!(dashboard.overview.activity_count, 2);
        assert!((dashboard.overview.total_distance - 15000.0 / 1609.34).abs() < 1e-9);
        assert_eq!(dashboard.recent_activities.len(), 2);
        assert!(dashboard
            .recent_activities
            .iter()
            .all(|row| row.activity_type == "Run"));

        // Ride bests are scoped out even though the batch has rides.
        assert!(dashboard.personal_bests.contains(PersonalBestCategory::FastestPace));
        assert!(!dashboard.personal_bests.contains(PersonalBestCategory::FastestRide));
    }

    #[test]
    fn test_type_breakdown_ignores_filter() {
        let activities = mixed_batch();
        let dashboard = build_dashboard(&activities, &query("Ride", DistanceUnit::Km));

        let types: Vec<_> = dashboard
            .type_breakdown
            .iter()
            .map(|row| row.activity_type.as_str())
            .collect();
        assert_eq!(types, vec!["Ride", "Run", "VirtualRide", "Walk"]);

        let run_row = &dashboard.type_breakdown[1];
        assert_eq!(run_row.count, 2);
        assert_eq!(run_row.distance_km, 15.0);
    }

    #[test]
    fn test_trend_prefers_runs() {
        let activities = mixed_batch();

        let all = build_dashboard(&activities, &query("All", DistanceUnit::Km));
        let trend = all.trend.unwrap();
        assert_eq!(trend.metric, TrendMetric::Pace);
        let values: Vec<f64> = trend.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![4.5, 4.0]);

        let rides = build_dashboard(&activities, &query("Ride", DistanceUnit::Km));
        let trend = rides.trend.unwrap();
        assert_eq!(trend.metric, TrendMetric::Speed);
        assert_eq!(trend.points.len(), 2);
        assert_eq!(trend.points[0].value, 30.0);

        let walks = build_dashboard(&activities, &query("Walk", DistanceUnit::Km));
        assert!(walks.trend.is_none());
    }

    #[test]
    fn test_trend_falls_back_to_rides_without_runs() {
        let activities = enriched(json!([
            {"id": 1, "type": "Ride", "start_date_local": "2024-03-06T08:00:00Z",
             "distance": 30000.0, "moving_time": 3600},
        ]));
        let dashboard = build_dashboard(&activities, &query("All", DistanceUnit::Km));
        assert_eq!(dashboard.trend.unwrap().metric, TrendMetric::Speed);
    }

    #[test]
    fn test_recent_rows_formatting() {
        let activities = mixed_batch();
        let dashboard = build_dashboard(&activities, &query("All", DistanceUnit::Km));

        let rows = &dashboard.recent_activities;
        assert_eq!(rows[0].name, "Walk");
        assert_eq!(rows[0].date, "13 Mar 2024 12:00");

        let easy = rows.iter().find(|row| row.id == "1").unwrap();
        assert_eq!(easy.distance, 10.0);
        assert_eq!(easy.time_min, 45);
        assert_eq!(easy.elevation_m, 40);
        assert_eq!(easy.pace, "4:30");
        assert_eq!(easy.speed_kmh, Some(13.3));
    }

    #[test]
    fn test_recent_limited() {
        let raw: Vec<Value> = (0..30)
            .map(|i| {
                json!({
                    "id": i,
                    "type": "Run",
                    "start_date_local": format!("2024-03-{:02}T07:00:00Z", i % 28 + 1),
                    "distance": 5000.0,
                    "moving_time": 1500,
                })
            })
            .collect();
        let activities = enriched(Value::Array(raw));
        let dashboard = build_dashboard(&activities, &query("All", DistanceUnit::Km));
        assert_eq!(dashboard.recent_activities.len(), RECENT_LIMIT);
        assert_eq!(dashboard.recent_activities[0].date, "28 Mar 2024 07:00");
    }

    #[test]
    fn test_empty_batch() {
        let dashboard = build_dashboard(&[], &query("All", DistanceUnit::Km));
        assert!(dashboard.empty);
        assert_eq!(dashboard.overview.activity_count, 0);
        assert_eq!(dashboard.overview.total_distance, 0.0);
        assert!(dashboard.weekly.is_empty());
        assert!(dashboard.monthly.is_empty());
        assert!(dashboard.trend.is_none());
        assert!(dashboard.type_breakdown.is_empty());
        assert!(dashboard.personal_bests.is_empty());
        assert!(dashboard.recent_activities.is_empty());
    }

    #[test]
    fn test_filter_matching_nothing_is_empty() {
        let activities = mixed_batch();
        let dashboard = build_dashboard(&activities, &query("Swim", DistanceUnit::Km));
        assert!(dashboard.empty);
        assert!(!dashboard.type_breakdown.is_empty());
    }
}
