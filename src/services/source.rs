// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Selection of the upstream that supplies raw activity batches.

use chrono::{Local, Utc};
use serde_json::Value;

use super::intervals::IntervalsClient;
use super::sample::generate_seeded;
use super::strava::StravaClient;
use crate::config::{Config, SourceKind};
use crate::error::AppError;

/// Where the dashboard loads its raw activities from.
#[derive(Clone)]
pub enum ActivitySource {
    Intervals(IntervalsClient),
    Strava(StravaClient),
    /// Seeded synthetic data
    Sample { seed: u64 },
}

impl ActivitySource {
    /// Build the source the configuration selects.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let source = match (config.source_kind(), &config.intervals, &config.strava) {
            (SourceKind::Intervals, Some(credentials), _) => {
                ActivitySource::Intervals(IntervalsClient::new(credentials)?)
            }
            (SourceKind::Strava, _, Some(credentials)) => {
                ActivitySource::Strava(StravaClient::new(credentials)?)
            }
            _ => ActivitySource::Sample {
                seed: config.sample_seed,
            },
        };
        tracing::info!(source = source.label(), "Activity source selected");
        Ok(source)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivitySource::Intervals(_) => "intervals",
            ActivitySource::Strava(_) => "strava",
            ActivitySource::Sample { .. } => "sample",
        }
    }

    pub fn is_sample(&self) -> bool {
        matches!(self, ActivitySource::Sample { .. })
    }

    /// Raw records for the last `weeks` weeks, as a JSON array.
    pub async fn fetch_recent(&self, weeks: u32) -> Result<Value, AppError> {
        match self {
            ActivitySource::Intervals(client) => {
                client.get_recent_activities(weeks, Utc::now()).await
            }
            ActivitySource::Strava(client) => client
                .get_recent_activities(weeks, Utc::now())
                .await
                .map(Value::Array),
            ActivitySource::Sample { seed } => Ok(Value::Array(generate_seeded(
                weeks,
                Local::now().naive_local(),
                *seed,
            ))),
        }
    }
}
