// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Synthetic activities for running the dashboard without an account.
//!
//! Records are shaped like Strava's activity list so they go through the
//! same normalization as real data.

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

use crate::time_utils::format_utc_rfc3339;

const RUN_NAMES: &[&str] = &[
    "Morning Run",
    "Easy Run",
    "Tempo Run",
    "Long Run",
    "Recovery Run",
    "Interval Session",
    "Park Run",
    "Marathon Training",
    "Hill Repeats",
    "Fartlek",
];

const RIDE_NAMES: &[&str] = &[
    "Morning Ride",
    "Lunch Ride",
    "Evening Ride",
    "Weekend Ride",
    "Coffee Ride",
    "Zwift Session",
    "Hill Climb",
    "Group Ride",
    "Recovery Spin",
    "Threshold Intervals",
];

/// Generate roughly four runs and two rides per week for the `weeks`
/// weeks ending at `now`, sorted by start date.
pub fn generate_sample_activities<R: Rng>(
    weeks: u32,
    now: NaiveDateTime,
    rng: &mut R,
) -> Vec<Value> {
    let mut activities = Vec::new();
    let mut next_id: u64 = 1;
    let mut current = now - Duration::weeks(i64::from(weeks));

    while current < now {
        for _ in 0..rng.gen_range(3..=5) {
            let start = random_start(rng, current, 6..=18);
            if start > now {
                break;
            }
            activities.push(sample_run(rng, next_id, start));
            next_id += 1;
        }

        for _ in 0..rng.gen_range(1..=3) {
            let start = random_start(rng, current, 7..=16);
            if start > now {
                break;
            }
            activities.push(sample_ride(rng, next_id, start));
            next_id += 1;
        }

        current += Duration::weeks(1);
    }

    // Timestamps share one format, so string order is time order.
    activities.sort_by(|a, b| {
        let a = a["start_date"].as_str().unwrap_or_default();
        let b = b["start_date"].as_str().unwrap_or_default();
        a.cmp(b)
    });

    tracing::debug!(weeks, count = activities.len(), "Generated sample activities");
    activities
}

/// Same as [`generate_sample_activities`] with a `StdRng` seeded from
/// `seed`, so repeated calls with equal inputs agree.
pub fn generate_seeded(weeks: u32, now: NaiveDateTime, seed: u64) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_sample_activities(weeks, now, &mut rng)
}

fn random_start<R: Rng>(
    rng: &mut R,
    week_start: NaiveDateTime,
    hours: std::ops::RangeInclusive<i64>,
) -> NaiveDateTime {
    week_start
        + Duration::days(rng.gen_range(0..=6))
        + Duration::hours(rng.gen_range(hours))
        + Duration::minutes(rng.gen_range(0..=59))
}

fn pick_name<R: Rng>(rng: &mut R, names: &[&'static str]) -> &'static str {
    names.choose(rng).copied().unwrap_or_default()
}

fn sample_run<R: Rng>(rng: &mut R, id: u64, start: NaiveDateTime) -> Value {
    let distance = rng.gen_range(5000.0..21000.0);
    let pace_sec_per_km = rng.gen_range(240.0..300.0);
    let moving_time = distance / 1000.0 * pace_sec_per_km;
    let elapsed_time = moving_time * rng.gen_range(1.0..1.1);
    let timestamp = format_utc_rfc3339(start.and_utc());

    json!({
        "id": id,
        "name": pick_name(rng, RUN_NAMES),
        "type": "Run",
        "start_date": timestamp,
        "start_date_local": timestamp,
        "distance": distance,
        "moving_time": moving_time as i64,
        "elapsed_time": elapsed_time as i64,
        "total_elevation_gain": rng.gen_range(20.0..200.0),
        "average_heartrate": rng.gen_range(140.0..170.0),
        "max_heartrate": rng.gen_range(165.0..195.0),
        "suffer_score": rng.gen_range(30..=150),
    })
}

fn sample_ride<R: Rng>(rng: &mut R, id: u64, start: NaiveDateTime) -> Value {
    let distance = rng.gen_range(20000.0..100000.0);
    let speed_kmh = rng.gen_range(25.0..35.0);
    let moving_time = distance / 1000.0 / speed_kmh * 3600.0;
    let elapsed_time = moving_time * rng.gen_range(1.0..1.15);
    let timestamp = format_utc_rfc3339(start.and_utc());

    json!({
        "id": id,
        "name": pick_name(rng, RIDE_NAMES),
        "type": "Ride",
        "start_date": timestamp,
        "start_date_local": timestamp,
        "distance": distance,
        "moving_time": moving_time as i64,
        "elapsed_time": elapsed_time as i64,
        "total_elevation_gain": rng.gen_range(100.0..1200.0),
        "average_heartrate": rng.gen_range(130.0..160.0),
        "max_heartrate": rng.gen_range(160.0..190.0),
        "suffer_score": rng.gen_range(40..=200),
        "average_watts": rng.gen_range(180.0..280.0),
    })
}
