// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod personal_best;
pub mod summary;

pub use activity::{EnrichedActivity, NormalizedActivity, RawActivityRecord};
pub use personal_best::{PersonalBest, PersonalBestCategory, PersonalBests};
pub use summary::{MonthlySummary, PeriodStats, WeeklySummary};
