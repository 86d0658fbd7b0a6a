// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Personal-best records found within a batch of activities.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Personal-best categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalBestCategory {
    FastestPace,
    LongestRun,
    MostClimbing,
    LongestEffort,
    #[serde(rename = "best_5k_pace")]
    Best5kPace,
    FastestRide,
    LongestRide,
    TopSpeed,
    BestAvgPower,
}

impl PersonalBestCategory {
    /// Key used in API responses (e.g. `fastest_pace`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FastestPace => "fastest_pace",
            Self::LongestRun => "longest_run",
            Self::MostClimbing => "most_climbing",
            Self::LongestEffort => "longest_effort",
            Self::Best5kPace => "best_5k_pace",
            Self::FastestRide => "fastest_ride",
            Self::LongestRide => "longest_ride",
            Self::TopSpeed => "top_speed",
            Self::BestAvgPower => "best_avg_power",
        }
    }
}

/// Best achievement in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PersonalBest {
    /// Display-formatted value (e.g. "4:30", "21.1 km")
    pub value: String,
    /// Name of the activity that set it
    pub name: String,
    /// Local date of that activity, `DD Mon YYYY`
    pub date: String,
    /// ID of the activity that set it
    pub activity_id: String,
    /// Unformatted value in the category's native unit
    #[serde(skip)]
    pub raw_value: f64,
}

/// Category → best achievement, in insertion order.
///
/// Serializes as a JSON object keyed by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalBests {
    entries: Vec<(PersonalBestCategory, PersonalBest)>,
}

impl PersonalBests {
    /// Insert a record, replacing any existing record in the same category
    /// without moving it.
    pub fn insert(&mut self, category: PersonalBestCategory, best: PersonalBest) {
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some(slot) => slot.1 = best,
            None => self.entries.push((category, best)),
        }
    }

    pub fn get(&self, category: PersonalBestCategory) -> Option<&PersonalBest> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, best)| best)
    }

    /// Look up a record by its API key (e.g. `"fastest_pace"`).
    pub fn get_by_key(&self, key: &str) -> Option<&PersonalBest> {
        self.entries
            .iter()
            .find(|(c, _)| c.as_str() == key)
            .map(|(_, best)| best)
    }

    pub fn contains(&self, category: PersonalBestCategory) -> bool {
        self.get(category).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersonalBestCategory, &PersonalBest)> {
        self.entries.iter().map(|(c, best)| (*c, best))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PersonalBests {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, best) in &self.entries {
            map.serialize_entry(category.as_str(), best)?;
        }
        map.end()
    }
}
