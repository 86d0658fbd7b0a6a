// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity Dashboard: running and cycling stats from Intervals.icu or Strava
//!
//! This crate normalizes raw activity records from either provider,
//! derives pace/speed and calendar buckets, and serves weekly/monthly
//! rollups and personal bests over a JSON API.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::ActivitySource;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub source: ActivitySource,
}
