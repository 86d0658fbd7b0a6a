// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde_json::Value;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a local timestamp as `DD Mon YYYY` (e.g. `05 Mar 2024`).
pub fn format_display_date(date: NaiveDateTime) -> String {
    date.format("%d %b %Y").to_string()
}

/// Format a local timestamp as `DD Mon YYYY HH:MM`.
pub fn format_display_datetime(date: NaiveDateTime) -> String {
    date.format("%d %b %Y %H:%M").to_string()
}

/// Parse a timestamp value into its wall-clock reading.
///
/// Accepts RFC3339 strings (the offset is dropped, the wall clock is
/// kept), naive `YYYY-MM-DDTHH:MM:SS[.f]` strings, bare `YYYY-MM-DD`
/// dates (midnight), and numbers of unix seconds.
pub fn parse_wall_clock(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                return Some(dt.naive_local());
            }
            for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
                    return Some(dt);
                }
            }
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        }
        Value::Number(n) => n
            .as_f64()
            .filter(|secs| secs.is_finite())
            .and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

/// Parse a timestamp value as an absolute UTC instant.
///
/// Strings without an offset are taken to be UTC.
pub fn parse_utc(value: &Value) -> Option<DateTime<Utc>> {
    if let Value::String(raw) = value {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    parse_wall_clock(value).map(|naive| naive.and_utc())
}

/// Midnight on the Monday of the ISO week containing `date`.
///
/// `None` when that Monday falls before the earliest representable date.
pub fn iso_week_start(date: NaiveDateTime) -> Option<NaiveDateTime> {
    let back = Days::new(u64::from(date.weekday().num_days_from_monday()));
    date.date()
        .checked_sub_days(back)
        .map(|day| day.and_time(NaiveTime::MIN))
}

/// `YYYY-MM` bucket label for a timestamp.
pub fn month_key(date: NaiveDateTime) -> String {
    date.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_wall_clock_keeps_local_reading() {
        let parsed = parse_wall_clock(&json!("2024-03-05T07:30:00-08:00")).unwrap();
        assert_eq!(parsed, naive("2024-03-05T07:30:00"));
    }

    #[test]
    fn test_parse_wall_clock_formats() {
        assert_eq!(
            parse_wall_clock(&json!("2024-03-05T07:30:00")),
            Some(naive("2024-03-05T07:30:00"))
        );
        assert_eq!(
            parse_wall_clock(&json!("2024-03-05T07:30:00.250")).map(|d| d.date()),
            Some(naive("2024-03-05T00:00:00").date())
        );
        assert_eq!(
            parse_wall_clock(&json!("2024-03-05")),
            Some(naive("2024-03-05T00:00:00"))
        );
        assert_eq!(
            parse_wall_clock(&json!(1_704_103_200)),
            Some(naive("2024-01-01T10:00:00"))
        );
        assert_eq!(parse_wall_clock(&json!("yesterday")), None);
        assert_eq!(parse_wall_clock(&json!(true)), None);
    }

    #[test]
    fn test_parse_utc_applies_offset() {
        let parsed = parse_utc(&json!("2024-03-05T07:30:00-08:00")).unwrap();
        assert_eq!(format_utc_rfc3339(parsed), "2024-03-05T15:30:00Z");
    }

    #[test]
    fn test_iso_week_start() {
        // Sunday belongs to the week starting the previous Monday.
        assert_eq!(
            iso_week_start(naive("2024-03-10T18:45:00")),
            Some(naive("2024-03-04T00:00:00"))
        );
        assert_eq!(
            iso_week_start(naive("2024-03-04T06:00:00")),
            Some(naive("2024-03-04T00:00:00"))
        );
        // Week spanning a year boundary.
        assert_eq!(
            iso_week_start(naive("2025-01-01T12:00:00")),
            Some(naive("2024-12-30T00:00:00"))
        );
    }

    #[test]
    fn test_iso_week_start_at_lower_bound() {
        // NaiveDate::MIN is a Thursday; its Monday is unrepresentable.
        let earliest = NaiveDate::MIN.and_time(NaiveTime::MIN);
        assert_eq!(iso_week_start(earliest), None);

        let parsed = parse_wall_clock(&json!("-262143-01-01")).unwrap();
        assert_eq!(iso_week_start(parsed), None);
    }

    #[test]
    fn test_display_formats() {
        let date = naive("2024-03-05T07:30:00");
        assert_eq!(format_display_date(date), "05 Mar 2024");
        assert_eq!(format_display_datetime(date), "05 Mar 2024 07:30");
        assert_eq!(month_key(date), "2024-03");
    }
}
