// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity processing pipeline.
//!
//! Raw provider records flow through:
//! 1. [`normalize`] - reconcile provider field names onto one record shape
//! 2. [`metrics`] - derive pace, speed, unit conversions and calendar buckets
//! 3. [`aggregate`] / [`personal_bests`] - independent consumers of the
//!    enriched records, both using [`classify`] for type families
//!
//! Everything here is synchronous and side-effect free apart from logging.

pub mod aggregate;
pub mod classify;
pub mod format;
pub mod metrics;
pub mod normalize;
pub mod personal_bests;

use serde::Serialize;
use serde_json::Value;

use crate::models::EnrichedActivity;
use classify::ActivityFamily;
use normalize::SkippedRecord;

/// Errors raised while turning raw records into activities.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// The batch is not a list of JSON objects.
    #[error("Malformed batch input: {0}")]
    MalformedBatchInput(String),

    /// A record has neither a local nor a general start timestamp that
    /// can be parsed.
    #[error("Record {index} has no parsable start date")]
    UnparsableTimestamp { index: usize, id: Option<String> },
}

/// Result of running a raw batch through normalization and enrichment.
#[derive(Debug, Clone, Default)]
pub struct ProcessedBatch {
    pub activities: Vec<EnrichedActivity>,
    /// Records dropped because their start date could not be resolved
    pub skipped: Vec<SkippedRecord>,
}

/// Normalize and enrich a raw JSON batch.
pub fn process_batch(raw: &Value) -> Result<ProcessedBatch, PipelineError> {
    let normalized = normalize::normalize_batch(raw)?;
    let activities = metrics::enrich_all(normalized.activities);

    tracing::debug!(
        activities = activities.len(),
        skipped = normalized.skipped.len(),
        "Processed activity batch"
    );

    Ok(ProcessedBatch {
        activities,
        skipped: normalized.skipped,
    })
}

/// Activity-type selection made by a caller.
///
/// `All` is a caller-level sentinel; the classifier only ever sees
/// concrete labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Label(String),
}

impl TypeFilter {
    pub const ALL: &'static str = "All";

    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == Self::ALL {
            TypeFilter::All
        } else {
            TypeFilter::Label(raw.to_string())
        }
    }

    /// Keep the activities this filter selects, in input order.
    pub fn apply<'a>(&self, activities: &'a [EnrichedActivity]) -> Vec<&'a EnrichedActivity> {
        match self {
            TypeFilter::All => activities.iter().collect(),
            TypeFilter::Label(label) => classify::filter_by_type(activities, label),
        }
    }

    /// True if records of `family` pass this filter.
    pub fn enables(&self, family: ActivityFamily) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Label(label) => label == family.as_str(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TypeFilter::All => Self::ALL,
            TypeFilter::Label(label) => label,
        }
    }
}

impl From<TypeFilter> for String {
    fn from(filter: TypeFilter) -> Self {
        filter.as_str().to_string()
    }
}
