//! Exercise model for storage, and the log shapes built from it.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::time_utils::iso_to_day;

/// Email reported in a log response when no exercise matched.
pub const NO_EMAIL_FOUND: &str = "no email found";

/// Exercise document stored in the `exercises` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Generated exercise ID (also used as document ID)
    #[serde(rename = "_id")]
    pub id: String,
    /// Owner's email at the time the exercise was recorded
    pub email: String,
    pub description: String,
    pub duration: f64,
    /// ISO 8601 timestamp (`2020-01-15T00:00:00.000Z`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Exercise {
    /// Build an exercise document owned by `email`.
    pub fn new(email: &str, input: NewExercise, date_iso: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            description: input.description,
            duration: input.duration,
            date: Some(date_iso),
        }
    }

    /// Reshape into a log entry with a day-string date.
    pub fn to_entry(&self) -> ExerciseEntry {
        ExerciseEntry {
            description: self.description.clone(),
            duration: self.duration,
            date: self.date.as_deref().and_then(iso_to_day),
        }
    }
}

/// Candidate exercise fields, checked before anything is written.
#[derive(Debug, Clone, Validate)]
pub struct NewExercise {
    #[validate(length(min = 1, message = "Please enter a description"))]
    pub description: String,
    #[validate(custom(function = "validate_duration"))]
    pub duration: f64,
}

fn validate_duration<D: Borrow<f64>>(duration: D) -> Result<(), ValidationError> {
    if duration.borrow().is_finite() {
        Ok(())
    } else {
        let mut error = ValidationError::new("not_finite");
        error.message = Some("Duration must be a finite number".into());
        Err(error)
    }
}

/// One entry of an exercise log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub description: String,
    pub duration: f64,
    /// Day string, e.g. `Wed Jan 15 2020`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Exercise log response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
    /// Email of the first matched exercise, or [`NO_EMAIL_FOUND`]
    pub email: String,
    pub count: usize,
    /// The user ID the caller asked for, echoed back
    #[serde(rename = "_id")]
    pub id: String,
    pub log: Vec<ExerciseEntry>,
}

impl ExerciseLog {
    /// Build a log response from matched exercises.
    pub fn from_exercises(user_id: &str, exercises: &[Exercise]) -> Self {
        let log: Vec<ExerciseEntry> = exercises.iter().map(Exercise::to_entry).collect();
        Self {
            email: exercises
                .first()
                .map(|e| e.email.clone())
                .unwrap_or_else(|| NO_EMAIL_FOUND.to_string()),
            count: log.len(),
            id: user_id.to_string(),
            log,
        }
    }
}
