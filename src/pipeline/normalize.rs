// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Field normalization for raw provider records.
//!
//! Strava and Intervals.icu name the same quantities differently. Each
//! canonical attribute has an ordered list of candidate field names; the
//! first candidate holding a usable value wins. Adding a provider means
//! extending [`FieldAliases`], nothing downstream changes.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::PipelineError;
use crate::models::{NormalizedActivity, RawActivityRecord};
use crate::time_utils::{iso_week_start, parse_utc, parse_wall_clock};

/// Type label used when a record carries none.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Candidate field names per canonical attribute, highest priority first.
#[derive(Debug, Clone)]
pub struct FieldAliases {
    pub id: &'static [&'static str],
    pub name: &'static [&'static str],
    pub activity_type: &'static [&'static str],
    pub start_date_local: &'static [&'static str],
    pub start_date: &'static [&'static str],
    pub distance: &'static [&'static str],
    pub moving_time: &'static [&'static str],
    pub elapsed_time: &'static [&'static str],
    pub elevation_gain: &'static [&'static str],
    pub average_watts: &'static [&'static str],
    pub weighted_average_watts: &'static [&'static str],
    pub max_speed: &'static [&'static str],
    pub average_heartrate: &'static [&'static str],
    pub max_heartrate: &'static [&'static str],
}

impl Default for FieldAliases {
    /// Strava names first, then Intervals.icu's `icu_` variants.
    fn default() -> Self {
        Self {
            id: &["id"],
            name: &["name"],
            activity_type: &["type", "sport_type"],
            start_date_local: &["start_date_local"],
            start_date: &["start_date"],
            distance: &["distance", "icu_distance"],
            moving_time: &["moving_time", "icu_moving_time"],
            elapsed_time: &["elapsed_time", "icu_recording_time"],
            elevation_gain: &["total_elevation_gain", "icu_elevation_gain"],
            average_watts: &["average_watts", "icu_average_watts"],
            weighted_average_watts: &["weighted_average_watts", "icu_weighted_avg_watts"],
            max_speed: &["max_speed"],
            average_heartrate: &["average_heartrate", "icu_average_hr"],
            max_heartrate: &["max_heartrate", "icu_max_hr"],
        }
    }
}

/// A record excluded from the batch, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    /// Position in the input batch
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Output of [`normalize_batch`].
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// One entry per usable input record, input order preserved
    pub activities: Vec<NormalizedActivity>,
    pub skipped: Vec<SkippedRecord>,
}

/// Normalize a JSON batch using the default field aliases.
///
/// Fails only if `raw` is not an array of objects. Records without a
/// resolvable start date are dropped and reported in `skipped`.
pub fn normalize_batch(raw: &Value) -> Result<NormalizedBatch, PipelineError> {
    normalize_batch_with(raw, &FieldAliases::default())
}

/// Normalize a JSON batch with a custom alias table.
pub fn normalize_batch_with(
    raw: &Value,
    aliases: &FieldAliases,
) -> Result<NormalizedBatch, PipelineError> {
    let items = raw.as_array().ok_or_else(|| {
        PipelineError::MalformedBatchInput(format!(
            "expected an array of activity records, got {}",
            json_kind(raw)
        ))
    })?;

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let record = item.as_object().ok_or_else(|| {
            PipelineError::MalformedBatchInput(format!(
                "record {} is {}, not an object",
                index,
                json_kind(item)
            ))
        })?;
        records.push(record);
    }

    Ok(normalize_records(records, aliases))
}

/// Normalize already-typed records.
pub fn normalize_records<'a, I>(records: I, aliases: &FieldAliases) -> NormalizedBatch
where
    I: IntoIterator<Item = &'a RawActivityRecord>,
{
    let mut batch = NormalizedBatch::default();

    for (index, record) in records.into_iter().enumerate() {
        match normalize_record(index, record, aliases) {
            Ok(activity) => batch.activities.push(activity),
            Err(err) => {
                let id = match &err {
                    PipelineError::UnparsableTimestamp { id, .. } => id.clone(),
                    PipelineError::MalformedBatchInput(_) => None,
                };
                tracing::warn!(index, id = ?id, error = %err, "Skipping activity record");
                batch.skipped.push(SkippedRecord {
                    index,
                    id,
                    reason: err.to_string(),
                });
            }
        }
    }

    batch
}

/// Normalize a single record.
///
/// `index` is the record's position in its batch; it doubles as the ID
/// when the record has none.
pub fn normalize_record(
    index: usize,
    record: &RawActivityRecord,
    aliases: &FieldAliases,
) -> Result<NormalizedActivity, PipelineError> {
    let id = first_string(record, aliases.id);

    let (start_date, start_date_local) =
        resolve_start(record, aliases).ok_or_else(|| PipelineError::UnparsableTimestamp {
            index,
            id: id.clone(),
        })?;

    Ok(NormalizedActivity {
        id: id.unwrap_or_else(|| index.to_string()),
        name: first_string(record, aliases.name).unwrap_or_default(),
        activity_type: first_string(record, aliases.activity_type)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        start_date,
        start_date_local,
        distance_m: first_number(record, aliases.distance).unwrap_or(0.0),
        moving_time_s: first_number(record, aliases.moving_time).unwrap_or(0.0),
        elapsed_time_s: first_number(record, aliases.elapsed_time).unwrap_or(0.0),
        elevation_gain_m: first_number(record, aliases.elevation_gain).unwrap_or(0.0),
        average_watts: first_number(record, aliases.average_watts),
        weighted_average_watts: first_number(record, aliases.weighted_average_watts),
        max_speed_m_s: first_number(record, aliases.max_speed),
        average_heartrate: first_number(record, aliases.average_heartrate),
        max_heartrate: first_number(record, aliases.max_heartrate),
    })
}

/// Resolve `(start_date, start_date_local)`.
///
/// The local timestamp is preferred for grouping; without one the general
/// start is read as local time. A missing general start mirrors the local
/// one. A local time must fall in a week whose Monday is representable.
fn resolve_start(
    record: &RawActivityRecord,
    aliases: &FieldAliases,
) -> Option<(DateTime<Utc>, NaiveDateTime)> {
    let local = first_match(record, aliases.start_date_local, parse_groupable);
    let general = first_match(record, aliases.start_date, parse_utc);

    let resolved = match (local, general) {
        (Some(local), Some(general)) => (general, local),
        (Some(local), None) => (local.and_utc(), local),
        (None, Some(general)) => {
            let wall_clock = first_match(record, aliases.start_date, parse_wall_clock)
                .unwrap_or_else(|| general.naive_utc());
            (general, wall_clock)
        }
        (None, None) => return None,
    };
    is_groupable(resolved.1).then_some(resolved)
}

fn parse_groupable(value: &Value) -> Option<NaiveDateTime> {
    parse_wall_clock(value).filter(|local| is_groupable(*local))
}

fn is_groupable(local: NaiveDateTime) -> bool {
    iso_week_start(local).is_some()
}

/// First candidate field whose value `convert` accepts. `null` counts as
/// absent.
fn first_match<T>(
    record: &RawActivityRecord,
    names: &[&str],
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    names
        .iter()
        .filter_map(|name| record.get(*name))
        .filter(|value| !value.is_null())
        .find_map(convert)
}

fn first_number(record: &RawActivityRecord, names: &[&str]) -> Option<f64> {
    first_match(record, names, as_number)
}

fn first_string(record: &RawActivityRecord, names: &[&str]) -> Option<String> {
    first_match(record, names, |value| match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Finite number from a JSON number or numeric string.
fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawActivityRecord {
        value.as_object().cloned().unwrap()
    }

    fn normalize_one(value: Value) -> Result<NormalizedActivity, PipelineError> {
        normalize_record(0, &record(value), &FieldAliases::default())
    }

    #[test]
    fn test_missing_totals_default_to_zero() {
        let activity = normalize_one(json!({
            "id": 7,
            "start_date_local": "2024-03-05T07:00:00Z"
        }))
        .unwrap();

        assert_eq!(activity.distance_m, 0.0);
        assert_eq!(activity.moving_time_s, 0.0);
        assert_eq!(activity.elapsed_time_s, 0.0);
        assert_eq!(activity.elevation_gain_m, 0.0);
        assert_eq!(activity.average_watts, None);
        assert_eq!(activity.max_speed_m_s, None);
        assert_eq!(activity.id, "7");
        assert_eq!(activity.name, "");
        assert_eq!(activity.activity_type, UNKNOWN_TYPE);
    }

    #[test]
    fn test_canonical_name_beats_alias() {
        let activity = normalize_one(json!({
            "start_date": "2024-03-05T07:00:00Z",
            "distance": 1000.0,
            "icu_distance": 2000.0,
            "icu_average_watts": 210.0,
        }))
        .unwrap();

        assert_eq!(activity.distance_m, 1000.0);
        assert_eq!(activity.average_watts, Some(210.0));
    }

    #[test]
    fn test_alias_used_when_canonical_null_or_missing() {
        let activity = normalize_one(json!({
            "start_date": "2024-03-05T07:00:00Z",
            "distance": null,
            "icu_distance": 2000.0,
            "icu_recording_time": "600",
            "icu_weighted_avg_watts": 250,
        }))
        .unwrap();

        assert_eq!(activity.distance_m, 2000.0);
        assert_eq!(activity.elapsed_time_s, 600.0);
        assert_eq!(activity.weighted_average_watts, Some(250.0));
    }

    #[test]
    fn test_local_start_preferred_for_grouping() {
        let activity = normalize_one(json!({
            "start_date": "2024-03-05T15:00:00Z",
            "start_date_local": "2024-03-05T07:00:00Z",
        }))
        .unwrap();

        assert_eq!(
            activity.start_date_local.format("%H:%M").to_string(),
            "07:00"
        );
        assert_eq!(activity.start_date.format("%H:%M").to_string(), "15:00");
    }

    #[test]
    fn test_general_start_mirrors_missing_local() {
        let activity = normalize_one(json!({
            "start_date": "2024-03-05T15:00:00+01:00",
        }))
        .unwrap();

        // Wall clock of the general start is taken as local time.
        assert_eq!(
            activity.start_date_local.format("%H:%M").to_string(),
            "15:00"
        );
        assert_eq!(activity.start_date.format("%H:%M").to_string(), "14:00");
    }

    #[test]
    fn test_local_start_mirrors_missing_general() {
        let activity = normalize_one(json!({
            "start_date_local": "2024-03-05T07:00:00",
        }))
        .unwrap();

        assert_eq!(activity.start_date, activity.start_date_local.and_utc());
    }

    #[test]
    fn test_unparsable_local_falls_back_to_general() {
        let activity = normalize_one(json!({
            "start_date_local": "not a date",
            "start_date": "2024-03-05T07:00:00Z",
        }))
        .unwrap();

        assert_eq!(activity.start_date_local.format("%d").to_string(), "05");
    }

    #[test]
    fn test_missing_start_is_unparsable() {
        let err = normalize_one(json!({"id": "i99", "start_date": "soon"})).unwrap_err();
        assert_eq!(
            err,
            PipelineError::UnparsableTimestamp {
                index: 0,
                id: Some("i99".to_string())
            }
        );
    }

    #[test]
    fn test_start_before_first_representable_week_is_skipped() {
        let earliest = DateTime::<Utc>::MIN_UTC.timestamp();
        let raw = json!([
            {"id": 1, "type": "Run", "start_date": earliest, "distance": 1000},
            {"id": 2, "type": "Run", "start_date_local": "-262143-01-01", "distance": 1000},
            {"id": 3, "type": "Run", "start_date": "2024-03-05T07:00:00Z", "distance": 1000},
        ]);

        let batch = normalize_batch(&raw).unwrap();
        let ids: Vec<_> = batch.activities.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["3"]);
        let skipped: Vec<_> = batch.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![0, 1]);
    }

    #[test]
    fn test_unrepresentable_local_falls_back_to_general() {
        let activity = normalize_one(json!({
            "start_date_local": "-262143-01-01",
            "start_date": "2024-03-05T07:00:00Z",
        }))
        .unwrap();

        assert_eq!(activity.start_date_local.format("%Y-%m-%d").to_string(), "2024-03-05");
    }

    #[test]
    fn test_type_falls_back_to_sport_type() {
        let activity = normalize_one(json!({
            "start_date": "2024-03-05T07:00:00Z",
            "sport_type": "VirtualRide",
        }))
        .unwrap();

        assert_eq!(activity.activity_type, "VirtualRide");
    }

    #[test]
    fn test_non_finite_and_garbage_numbers_are_absent() {
        let activity = normalize_one(json!({
            "start_date": "2024-03-05T07:00:00Z",
            "average_watts": "n/a",
            "max_speed": true,
        }))
        .unwrap();

        assert_eq!(activity.average_watts, None);
        assert_eq!(activity.max_speed_m_s, None);
    }

    #[test]
    fn test_batch_preserves_order_and_skips_bad_dates() {
        let raw = json!([
            {"id": 1, "start_date": "2024-03-05T07:00:00Z"},
            {"id": 2},
            {"id": 3, "start_date": "2024-03-04T07:00:00Z"},
        ]);

        let batch = normalize_batch(&raw).unwrap();
        let ids: Vec<_> = batch.activities.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].index, 1);
        assert_eq!(batch.skipped[0].id.as_deref(), Some("2"));
    }

    #[test]
    fn test_empty_batch_is_not_an_error() {
        let batch = normalize_batch(&json!([])).unwrap();
        assert!(batch.activities.is_empty());
        assert!(batch.skipped.is_empty());
    }

    #[test]
    fn test_malformed_batches() {
        assert!(matches!(
            normalize_batch(&json!("activities")),
            Err(PipelineError::MalformedBatchInput(_))
        ));
        assert!(matches!(
            normalize_batch(&json!([{"id": 1}, 42])),
            Err(PipelineError::MalformedBatchInput(_))
        ));
    }
}
