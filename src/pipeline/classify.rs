// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity-type families.

use crate::models::EnrichedActivity;

/// Coarse activity bucket that absorbs virtual/indoor variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityFamily {
    Run,
    Ride,
}

impl ActivityFamily {
    pub const ALL: [ActivityFamily; 2] = [ActivityFamily::Run, ActivityFamily::Ride];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityFamily::Run => "Run",
            ActivityFamily::Ride => "Ride",
        }
    }

    /// Raw type labels belonging to this family.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ActivityFamily::Run => &["Run", "VirtualRun"],
            ActivityFamily::Ride => &["Ride", "VirtualRide"],
        }
    }

    pub fn contains(&self, raw_type: &str) -> bool {
        self.aliases().contains(&raw_type)
    }

    /// Family named exactly `label` (e.g. "Run").
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == label)
    }
}

/// Family of a raw type label, if it has one.
pub fn classify(raw_type: &str) -> Option<ActivityFamily> {
    ActivityFamily::ALL.into_iter().find(|f| f.contains(raw_type))
}

/// Family name for a raw label, or the label unchanged.
pub fn family_label(raw_type: &str) -> &str {
    classify(raw_type).map_or(raw_type, |f| f.as_str())
}

/// True if `raw_type` is selected by `label`.
///
/// A family name selects the whole family; any other label selects exact
/// matches only.
pub fn matches_label(raw_type: &str, label: &str) -> bool {
    match ActivityFamily::from_label(label) {
        Some(family) => family.contains(raw_type),
        None => raw_type == label,
    }
}

/// Activities selected by `label`, in input order.
pub fn filter_by_type<'a>(
    activities: &'a [EnrichedActivity],
    label: &str,
) -> Vec<&'a EnrichedActivity> {
    activities
        .iter()
        .filter(|a| matches_label(a.activity_type(), label))
        .collect()
}

/// Activities belonging to `family`, in input order.
pub fn filter_by_family<'a, I>(
    activities: I,
    family: ActivityFamily,
) -> Vec<&'a EnrichedActivity>
where
    I: IntoIterator<Item = &'a EnrichedActivity>,
{
    activities
        .into_iter()
        .filter(|a| family.contains(a.activity_type()))
        .collect()
}
