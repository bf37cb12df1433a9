// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise tracking operations.
//!
//! Four request/response operations over the `users` and `exercises`
//! collections. Input is validated here, before anything is written;
//! uniqueness is left to the database.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::config::{Config, DEFAULT_LOG_LIMIT, MAX_LOG_LIMIT};
use crate::db::{ExerciseDb, ExerciseQuery, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{Exercise, ExerciseLog, NewExercise, NewUser, User};
use crate::time_utils::{format_day, format_iso, format_utc_rfc3339, parse_date};

/// Exercise-tracking store over a document database.
#[derive(Clone)]
pub struct ExerciseTracker<D> {
    db: D,
    default_log_limit: u32,
}

impl ExerciseTracker<FirestoreDb> {
    /// Connect to Firestore using the loaded configuration.
    pub async fn connect(config: &Config) -> Result<Self> {
        let db = FirestoreDb::new(&config.gcp_project_id).await?;
        Ok(Self::new(db).with_default_log_limit(config.default_log_limit))
    }
}

impl<D: ExerciseDb> ExerciseTracker<D> {
    pub fn new(db: D) -> Self {
        Self {
            db,
            default_log_limit: DEFAULT_LOG_LIMIT,
        }
    }

    /// Override the log limit used when callers pass none.
    pub fn with_default_log_limit(mut self, limit: u32) -> Self {
        self.default_log_limit = limit.min(MAX_LOG_LIMIT);
        self
    }

    /// The underlying database.
    pub fn db(&self) -> &D {
        &self.db
    }

    // ─── Users ───────────────────────────────────────────────────

    /// Return the user matching both email and password, creating it if
    /// there is none.
    ///
    /// A known email with a different password is not a match, so it leads
    /// to a creation attempt that the database rejects with
    /// [`AppError::Conflict`].
    pub async fn get_or_create_user(&self, email: &str, password: &str) -> Result<User> {
        let input = NewUser::new(email, password);

        if let Some(user) = self
            .db
            .find_user_by_credentials(&input.email, &input.password)
            .await?
        {
            tracing::debug!(user_id = %user.id, "Found existing user");
            return Ok(user);
        }

        input.validate()?;
        let user = User::new(input);

        tracing::debug!(
            user_id = %user.id,
            email = %user.email,
            "User about to be created and saved"
        );
        self.db.insert_user(&user).await?;
        tracing::info!(
            user_id = %user.id,
            email = %user.email,
            "New user created and saved"
        );

        self.db
            .find_user_by_email_and_id(&user.email, &user.id)
            .await?
            .ok_or_else(|| {
                AppError::Database(format!("User {} not readable after insert", user.id))
            })
    }

    /// All stored users.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.db.list_users().await?;
        tracing::debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    // ─── Exercises ───────────────────────────────────────────────

    /// Record an exercise for the user with the given ID.
    ///
    /// An empty `date` means now. Returns `None` when the user does not
    /// exist, whatever the description and duration. The returned user
    /// carries the new exercise in its `description`/`duration`/`date`
    /// fields; those are not persisted.
    pub async fn record_exercise(
        &self,
        user_id: &str,
        description: &str,
        duration: f64,
        date: &str,
    ) -> Result<Option<User>> {
        let when = if date.trim().is_empty() {
            Utc::now()
        } else {
            parse_date_param("date", date)?
        };

        let Some(mut user) = self.resolve_user(user_id).await? else {
            tracing::warn!(user_id, "User was not found, exercise not recorded");
            return Ok(None);
        };

        let input = NewExercise {
            description: description.to_string(),
            duration,
        };
        input.validate()?;

        let exercise = Exercise::new(&user.email, input, format_iso(when));
        self.db.insert_exercise(&exercise).await?;

        tracing::info!(
            user_id = %user.id,
            exercise_id = %exercise.id,
            date = %format_utc_rfc3339(when),
            "Exercise recorded"
        );

        user.description = Some(exercise.description);
        user.duration = Some(exercise.duration);
        user.date = Some(format_day(when));
        Ok(Some(user))
    }

    /// Fetch the exercise log for a user.
    ///
    /// `from` and `to` only filter when both are given. `limit` is a decimal
    /// string; fractions are truncated and `0` means the default limit.
    ///
    /// If the user does not exist the query runs without an email filter and
    /// returns exercises of every user.
    pub async fn fetch_exercise_logs(
        &self,
        user_id: &str,
        from: Option<&str>,
        to: Option<&str>,
        limit: Option<&str>,
    ) -> Result<ExerciseLog> {
        let date_range = match (non_empty(from), non_empty(to)) {
            (Some(from), Some(to)) => Some((
                format_iso(parse_date_param("from", from)?),
                format_iso(parse_date_param("to", to)?),
            )),
            _ => None,
        };
        let limit = self.parse_limit(limit)?;

        let email = match self.resolve_user(user_id).await? {
            Some(user) => Some(user.email),
            None => {
                tracing::warn!(
                    user_id,
                    "User was not found, querying exercises of all users"
                );
                None
            }
        };

        let query = ExerciseQuery {
            email,
            date_range,
            limit,
        };
        tracing::debug!(?query, "Querying exercise log");

        let exercises = self.db.query_exercises(&query).await?;
        Ok(ExerciseLog::from_exercises(user_id, &exercises))
    }

    // ─── Helpers ─────────────────────────────────────────────────

    /// Look up a user by ID. Anything that is not a UUID cannot exist.
    async fn resolve_user(&self, user_id: &str) -> Result<Option<User>> {
        match Uuid::parse_str(user_id.trim()) {
            Ok(id) => self.db.find_user(&id.to_string()).await,
            Err(_) => Ok(None),
        }
    }

    fn parse_limit(&self, limit: Option<&str>) -> Result<u32> {
        let Some(raw) = non_empty(limit) else {
            return Ok(self.default_log_limit);
        };

        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid limit: {raw:?}")))?;

        // Firestore sends the limit as i32; larger values would wrap negative
        match value.min(MAX_LOG_LIMIT as f64) as u32 {
            0 => Ok(self.default_log_limit),
            n => Ok(n),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date_param(name: &str, value: &str) -> Result<DateTime<Utc>> {
    parse_date(value).ok_or_else(|| AppError::BadRequest(format!("Invalid {name}: {value:?}")))
}
