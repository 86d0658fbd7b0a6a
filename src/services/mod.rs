// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - activity sources and the dashboard view.

pub mod dashboard;
pub mod intervals;
pub mod sample;
pub mod source;
pub mod strava;
pub mod upstream;

pub use dashboard::{build_dashboard, Dashboard, DashboardQuery, DistanceUnit};
pub use intervals::IntervalsClient;
pub use source::ActivitySource;
pub use strava::StravaClient;
