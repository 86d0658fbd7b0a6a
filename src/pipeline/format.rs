// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Display formatting for metric values.

/// Placeholder shown for an undefined pace.
pub const NO_PACE: &str = "--:--";

/// Format decimal minutes-per-km as `m:ss` (4.5 → "4:30").
///
/// Seconds that round up to 60 carry into the minute.
pub fn format_pace(pace: Option<f64>) -> String {
    let Some(pace) = pace.filter(|p| p.is_finite() && *p >= 0.0) else {
        return NO_PACE.to_string();
    };

    let mut minutes = pace.floor() as u64;
    let mut seconds = ((pace - pace.floor()) * 60.0).round() as u64;
    if seconds == 60 {
        minutes += 1;
        seconds = 0;
    }
    format!("{}:{:02}", minutes, seconds)
}

/// Format a duration in minutes as "1h 05m", or "45 min" under an hour.
pub fn format_duration_min(minutes: f64) -> String {
    let minutes = minutes.max(0.0);
    if minutes >= 60.0 {
        let total = minutes.round() as u64;
        format!("{}h {:02}m", total / 60, total % 60)
    } else {
        // Rounding never promotes a sub-hour effort to "1h 00m".
        format!("{} min", (minutes.round() as u64).min(59))
    }
}

/// Distance with one decimal and its unit label ("21.1 km").
pub fn format_distance(value: f64, unit_label: &str) -> String {
    format!("{:.1} {}", value, unit_label)
}

pub fn format_speed_kmh(kmh: f64) -> String {
    format!("{:.1} km/h", kmh)
}

pub fn format_elevation_m(meters: f64) -> String {
    format!("{:.0} m", meters)
}

pub fn format_power_w(watts: f64) -> String {
    format!("{:.0} W", watts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(Some(4.5)), "4:30");
        assert_eq!(format_pace(Some(4.0)), "4:00");
        assert_eq!(format_pace(Some(5.25)), "5:15");
        assert_eq!(format_pace(Some(3.05)), "3:03");
    }

    #[test]
    fn test_format_pace_carries_rounded_minute() {
        assert_eq!(format_pace(Some(4.9999)), "5:00");
    }

    #[test]
    fn test_format_pace_undefined() {
        assert_eq!(format_pace(None), NO_PACE);
        assert_eq!(format_pace(Some(f64::NAN)), NO_PACE);
        assert_eq!(format_pace(Some(f64::INFINITY)), NO_PACE);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_min(45.2), "45 min");
        assert_eq!(format_duration_min(59.6), "59 min");
        assert_eq!(format_duration_min(59.4), "59 min");
        assert_eq!(format_duration_min(60.0), "1h 00m");
        assert_eq!(format_duration_min(119.7), "2h 00m");
        assert_eq!(format_duration_min(125.4), "2h 05m");
    }

    #[test]
    fn test_value_formats() {
        assert_eq!(format_distance(21.0975, "km"), "21.1 km");
        assert_eq!(format_speed_kmh(32.44), "32.4 km/h");
        assert_eq!(format_elevation_m(1234.6), "1235 m");
        assert_eq!(format_power_w(245.4), "245 W");
    }
}
