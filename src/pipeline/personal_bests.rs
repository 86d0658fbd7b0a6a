// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Best-in-batch achievements per activity family.
//!
//! Records are only as "personal" as the batch handed in: nothing is
//! stored between calls. Ties go to the activity that appears first.

use super::classify::{filter_by_family, ActivityFamily};
use super::format::{
    format_distance, format_duration_min, format_elevation_m, format_pace, format_power_w,
    format_speed_kmh,
};
use super::metrics::MPS_TO_KMH;
use super::TypeFilter;
use crate::models::{EnrichedActivity, PersonalBest, PersonalBestCategory, PersonalBests};
use crate::time_utils::format_display_date;

/// Minimum distance (km) for a run to count toward `best_5k_pace`.
pub const FIVE_K_KM: f64 = 5.0;

/// Compute personal bests for the families `filter` enables.
///
/// Families other than Run and Ride have no categories, so a filter on
/// any other label yields an empty result.
pub fn get_personal_bests<'a, I>(activities: I, filter: &TypeFilter) -> PersonalBests
where
    I: IntoIterator<Item = &'a EnrichedActivity>,
{
    let activities: Vec<&EnrichedActivity> = activities.into_iter().collect();
    let mut pbs = PersonalBests::default();

    if filter.enables(ActivityFamily::Run) {
        let runs = filter_by_family(activities.iter().copied(), ActivityFamily::Run);
        run_bests(&runs, &mut pbs);
    }

    if filter.enables(ActivityFamily::Ride) {
        let rides = filter_by_family(activities.iter().copied(), ActivityFamily::Ride);
        ride_bests(&rides, &mut pbs);
    }

    pbs
}

fn run_bests(runs: &[&EnrichedActivity], pbs: &mut PersonalBests) {
    if runs.is_empty() {
        return;
    }

    if let Some((run, pace)) = first_min_by(runs, |a| a.pace_min_per_km) {
        pbs.insert(
            PersonalBestCategory::FastestPace,
            record(run, format_pace(Some(pace)), pace),
        );
    }

    if let Some((run, km)) = first_max_by(runs, |a| Some(a.distance_km)) {
        pbs.insert(
            PersonalBestCategory::LongestRun,
            record(run, format_distance(km, "km"), km),
        );
    }

    if let Some((run, gain)) = first_max_by(runs, positive_elevation) {
        pbs.insert(
            PersonalBestCategory::MostClimbing,
            record(run, format_elevation_m(gain), gain),
        );
    }

    if let Some((run, minutes)) = first_max_by(runs, |a| Some(a.moving_time_min)) {
        pbs.insert(
            PersonalBestCategory::LongestEffort,
            record(run, format_duration_min(minutes), minutes),
        );
    }

    let five_k_pace =
        |a: &EnrichedActivity| a.pace_min_per_km.filter(|_| a.distance_km >= FIVE_K_KM);
    if let Some((run, pace)) = first_min_by(runs, five_k_pace) {
        pbs.insert(
            PersonalBestCategory::Best5kPace,
            record(run, format_pace(Some(pace)), pace),
        );
    }
}

fn ride_bests(rides: &[&EnrichedActivity], pbs: &mut PersonalBests) {
    if rides.is_empty() {
        return;
    }

    if let Some((ride, kmh)) = first_max_by(rides, |a| a.speed_kmh) {
        pbs.insert(
            PersonalBestCategory::FastestRide,
            record(ride, format_speed_kmh(kmh), kmh),
        );
    }

    if let Some((ride, km)) = first_max_by(rides, |a| Some(a.distance_km)) {
        pbs.insert(
            PersonalBestCategory::LongestRide,
            record(ride, format_distance(km, "km"), km),
        );
    }

    // Shared with runs: one entry, the bigger climb wins and runs keep ties.
    if let Some((ride, gain)) = first_max_by(rides, positive_elevation) {
        let beats_run = pbs
            .get(PersonalBestCategory::MostClimbing)
            .is_none_or(|run_best| gain > run_best.raw_value);
        if beats_run {
            pbs.insert(
                PersonalBestCategory::MostClimbing,
                record(ride, format_elevation_m(gain), gain),
            );
        }
    }

    let top_speed = |a: &EnrichedActivity| a.activity.max_speed_m_s.filter(|v| *v > 0.0);
    if let Some((ride, mps)) = first_max_by(rides, top_speed) {
        let kmh = mps * MPS_TO_KMH;
        pbs.insert(
            PersonalBestCategory::TopSpeed,
            record(ride, format_speed_kmh(kmh), kmh),
        );
    }

    let avg_power = |a: &EnrichedActivity| a.activity.average_watts.filter(|w| *w > 0.0);
    if let Some((ride, watts)) = first_max_by(rides, avg_power) {
        pbs.insert(
            PersonalBestCategory::BestAvgPower,
            record(ride, format_power_w(watts), watts),
        );
    }
}

fn positive_elevation(activity: &EnrichedActivity) -> Option<f64> {
    Some(activity.activity.elevation_gain_m).filter(|gain| *gain > 0.0)
}

fn record(activity: &EnrichedActivity, value: String, raw_value: f64) -> PersonalBest {
    PersonalBest {
        value,
        name: activity.name().to_string(),
        date: format_display_date(activity.start_date_local()),
        activity_id: activity.activity.id.clone(),
        raw_value,
    }
}

/// First activity holding the smallest defined value.
fn first_min_by<'a>(
    activities: &[&'a EnrichedActivity],
    value: impl Fn(&EnrichedActivity) -> Option<f64>,
) -> Option<(&'a EnrichedActivity, f64)> {
    first_extremum(activities, value, |candidate, best| candidate < best)
}

/// First activity holding the largest defined value.
fn first_max_by<'a>(
    activities: &[&'a EnrichedActivity],
    value: impl Fn(&EnrichedActivity) -> Option<f64>,
) -> Option<(&'a EnrichedActivity, f64)> {
    first_extremum(activities, value, |candidate, best| candidate > best)
}

/// Scan in input order, replacing the current best only on a strict
/// improvement so that ties keep the earlier activity.
fn first_extremum<'a>(
    activities: &[&'a EnrichedActivity],
    value: impl Fn(&EnrichedActivity) -> Option<f64>,
    improves: impl Fn(f64, f64) -> bool,
) -> Option<(&'a EnrichedActivity, f64)> {
    let mut best: Option<(&'a EnrichedActivity, f64)> = None;
    for &activity in activities {
        let Some(v) = value(activity).filter(|v| !v.is_nan()) else {
            continue;
        };
        match best {
            Some((_, current)) if !improves(v, current) => {}
            _ => best = Some((activity, v)),
        }
    }
    best
}
