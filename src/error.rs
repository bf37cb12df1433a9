// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types shared by the store and its database backends.

use validator::ValidationErrors;

/// Store error type.
///
/// Unknown user ids are not errors: the tracker reports them through
/// `Option` results or placeholder log responses instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Whether this error is a uniqueness violation (e.g. a duplicate email).
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }

    /// Whether this error was raised before anything reached the database.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::BadRequest(_))
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, AppError>;
