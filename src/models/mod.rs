// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod exercise;
pub mod user;

pub use exercise::{Exercise, ExerciseEntry, ExerciseLog, NewExercise, NO_EMAIL_FOUND};
pub use user::{normalize_email, NewUser, User};
