// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly and monthly rollups.

use std::collections::BTreeMap;

use crate::models::{EnrichedActivity, MonthlySummary, PeriodStats, WeeklySummary};

/// Running sums for one bucket.
#[derive(Debug, Default)]
struct Accumulator {
    distance_km: f64,
    distance_miles: f64,
    moving_time_min: f64,
    elevation_m: f64,
    count: u32,
    pace_sum: f64,
    pace_count: u32,
    speed_sum: f64,
    speed_count: u32,
}

impl Accumulator {
    fn add(&mut self, activity: &EnrichedActivity) {
        self.distance_km += activity.distance_km;
        self.distance_miles += activity.distance_miles;
        self.moving_time_min += activity.moving_time_min;
        self.elevation_m += activity.activity.elevation_gain_m;
        self.count += 1;

        // Undefined pace/speed stays out of both numerator and denominator.
        if let Some(pace) = activity.pace_min_per_km {
            self.pace_sum += pace;
            self.pace_count += 1;
        }
        if let Some(speed) = activity.speed_kmh {
            self.speed_sum += speed;
            self.speed_count += 1;
        }
    }

    fn finish(self) -> PeriodStats {
        PeriodStats {
            total_distance_km: self.distance_km,
            total_distance_miles: self.distance_miles,
            total_moving_time_min: self.moving_time_min,
            total_elevation_m: self.elevation_m,
            activity_count: self.count,
            avg_pace: mean(self.pace_sum, self.pace_count),
            avg_speed_kmh: mean(self.speed_sum, self.speed_count),
        }
    }
}

fn mean(sum: f64, count: u32) -> Option<f64> {
    (count > 0).then(|| sum / f64::from(count))
}

/// Group activities by `key` and total each group, ascending by key.
fn summarize_by<'a, K, I, F>(activities: I, key: F) -> Vec<(K, PeriodStats)>
where
    K: Ord,
    I: IntoIterator<Item = &'a EnrichedActivity>,
    F: Fn(&EnrichedActivity) -> K,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for activity in activities {
        groups.entry(key(activity)).or_default().add(activity);
    }

    groups
        .into_iter()
        .map(|(k, acc)| (k, acc.finish()))
        .collect()
}

/// One row per ISO week present in `activities`, oldest first.
pub fn weekly_summary<'a, I>(activities: I) -> Vec<WeeklySummary>
where
    I: IntoIterator<Item = &'a EnrichedActivity>,
{
    summarize_by(activities, |a| a.week_start)
        .into_iter()
        .map(|(week_start, stats)| WeeklySummary { week_start, stats })
        .collect()
}

/// One row per `YYYY-MM` month present in `activities`, oldest first.
pub fn monthly_summary<'a, I>(activities: I) -> Vec<MonthlySummary>
where
    I: IntoIterator<Item = &'a EnrichedActivity>,
{
    summarize_by(activities, |a| a.month.clone())
        .into_iter()
        .map(|(month, stats)| MonthlySummary { month, stats })
        .collect()
}
