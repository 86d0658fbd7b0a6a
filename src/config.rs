//! Application configuration loaded from environment variables.
//!
//! Upstream credentials are optional. With none configured the dashboard
//! serves synthetic activities so it can be run without an account.

use std::env;

/// Smallest lookback window (weeks) the dashboard accepts.
pub const MIN_WEEKS: u32 = 4;
/// Largest lookback window (weeks) the dashboard accepts.
pub const MAX_WEEKS: u32 = 52;

/// Intervals.icu credentials (athlete ID plus API key).
#[derive(Debug, Clone)]
pub struct IntervalsCredentials {
    pub athlete_id: String,
    pub api_key: String,
}

/// Strava OAuth application credentials plus a long-lived refresh token.
#[derive(Debug, Clone)]
pub struct StravaCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Where activities are loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Intervals,
    Strava,
    Sample,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Intervals.icu credentials, if both variables are set
    pub intervals: Option<IntervalsCredentials>,
    /// Strava credentials, if all three variables are set
    pub strava: Option<StravaCredentials>,
    /// Seed for the synthetic activity generator
    pub sample_seed: u64,
    /// Lookback window used when a request doesn't give one
    pub default_weeks: u32,
}

impl Config {
    /// Default config for testing only (no upstream credentials).
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            intervals: None,
            strava: None,
            sample_seed: 42,
            default_weeks: 12,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let intervals = match (
            non_empty_var("INTERVALS_ATHLETE_ID"),
            non_empty_var("INTERVALS_API_KEY"),
        ) {
            (Some(athlete_id), Some(api_key)) => Some(IntervalsCredentials {
                athlete_id,
                api_key,
            }),
            _ => None,
        };

        let strava = match (
            non_empty_var("STRAVA_CLIENT_ID"),
            non_empty_var("STRAVA_CLIENT_SECRET"),
            non_empty_var("STRAVA_REFRESH_TOKEN"),
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => {
                Some(StravaCredentials {
                    client_id,
                    client_secret,
                    refresh_token,
                })
            }
            _ => None,
        };

        let sample_seed = match non_empty_var("SAMPLE_SEED") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("SAMPLE_SEED"))?,
            None => 42,
        };

        let default_weeks = match non_empty_var("DEFAULT_WEEKS") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| ConfigError::Invalid("DEFAULT_WEEKS"))?
                .clamp(MIN_WEEKS, MAX_WEEKS),
            None => 12,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            intervals,
            strava,
            sample_seed,
            default_weeks,
        })
    }

    /// Pick the activity source: Intervals.icu, then Strava, then sample data.
    pub fn source_kind(&self) -> SourceKind {
        if self.intervals.is_some() {
            SourceKind::Intervals
        } else if self.strava.is_some() {
            SourceKind::Strava
        } else {
            SourceKind::Sample
        }
    }
}

/// Read an env var, treating empty or whitespace-only values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_defaults_to_sample() {
        let config = Config::test_default();
        assert_eq!(config.source_kind(), SourceKind::Sample);
    }

    #[test]
    fn test_intervals_takes_priority_over_strava() {
        let mut config = Config::test_default();
        config.strava = Some(StravaCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
        });
        assert_eq!(config.source_kind(), SourceKind::Strava);

        config.intervals = Some(IntervalsCredentials {
            athlete_id: "i123".to_string(),
            api_key: "key".to_string(),
        });
        assert_eq!(config.source_kind(), SourceKind::Intervals);
    }

    #[test]
    fn test_config_from_env() {
        // Set env vars for test
        env::set_var("INTERVALS_ATHLETE_ID", "i42");
        env::set_var("INTERVALS_API_KEY", "  secret  ");
        env::set_var("DEFAULT_WEEKS", "100");

        let config = Config::from_env().expect("Config should load");

        let intervals = config.intervals.expect("Intervals credentials");
        assert_eq!(intervals.athlete_id, "i42");
        assert_eq!(intervals.api_key, "secret");
        assert_eq!(config.default_weeks, MAX_WEEKS);

        env::remove_var("INTERVALS_ATHLETE_ID");
        env::remove_var("INTERVALS_API_KEY");
        env::remove_var("DEFAULT_WEEKS");
    }
}
