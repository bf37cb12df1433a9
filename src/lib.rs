// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Exercise-Tracker: persistence layer for a fitness log
//!
//! Users are identified by email and password; exercises (description,
//! duration, date) are tied to their owner by email. The crate stores both in
//! a document database and answers exercise-log queries with optional date
//! range and limit filters.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod time_utils;

pub use error::{AppError, Result};
pub use services::ExerciseTracker;
