// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides the document operations for:
//! - Users (profile storage, unique by email)
//! - Exercises (one document per recorded exercise)
//! - Email reservations (the unique email index)

use async_trait::async_trait;
use firestore::errors::FirestoreError;
use serde::{Deserialize, Serialize};

use crate::db::{collections, ExerciseDb, ExerciseQuery};
use crate::error::{AppError, Result};
use crate::models::{Exercise, User};

/// Claim on an email address, stored at `user_emails/{email}`.
///
/// Created with a create-only write, so a second claim on the same email
/// fails with "already exists".
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmailReservation {
    user_id: String,
}

/// Emails may contain `/`, which document IDs cannot.
fn email_doc_id(email: &str) -> String {
    urlencoding::encode(email).into_owned()
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Connect to the exercise store in `project_id`.
    ///
    /// Uses application default credentials, or the local emulator when
    /// `FIRESTORE_EMULATOR_HOST` is set.
    pub async fn new(project_id: &str) -> Result<Self> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Firestore connection failed: {e}")))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Emulator connection. The emulator accepts any bearer token, so a fixed
    /// unsigned JWT stands in for credentials.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!(project = project_id, "Connecting to Firestore emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Firestore emulator connection failed: {e}"))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore emulator");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Backend with no connection. Every operation fails with
    /// [`AppError::Database`]; tests use it to check that store errors
    /// reach the caller unchanged.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Exercise store is offline".to_string()))
    }

    // ─── Email Reservations ──────────────────────────────────────

    async fn reserve_email(&self, user: &User) -> Result<()> {
        let reservation = EmailReservation {
            user_id: user.id.clone(),
        };

        let _: EmailReservation = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USER_EMAILS)
            .document_id(email_doc_id(&user.email))
            .object(&reservation)
            .execute()
            .await
            .map_err(|e| match e {
                FirestoreError::DataConflictError(_) => {
                    AppError::Conflict(format!("email {}", user.email))
                }
                e => AppError::Database(e.to_string()),
            })?;
        Ok(())
    }

    async fn release_email(&self, email: &str) -> Result<()> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USER_EMAILS)
            .document_id(email_doc_id(email))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ExerciseDb for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn find_user_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| {
                q.for_all([
                    q.field("email").eq(email),
                    q.field("password").eq(password),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Reserve the email, then create the user document.
    ///
    /// If the user write fails the reservation is released so the email can
    /// be claimed again.
    async fn insert_user(&self, user: &User) -> Result<()> {
        self.reserve_email(user).await?;

        let created: Result<User> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(&user.stored())
            .execute()
            .await
            .map_err(|e| match e {
                FirestoreError::DataConflictError(_) => {
                    AppError::Conflict(format!("user {}", user.id))
                }
                e => AppError::Database(e.to_string()),
            });

        if let Err(err) = created {
            if let Err(release_err) = self.release_email(&user.email).await {
                tracing::warn!(
                    email = %user.email,
                    error = %release_err,
                    "Failed to release email reservation"
                );
            }
            return Err(err);
        }

        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Exercise Operations ─────────────────────────────────────

    async fn insert_exercise(&self, exercise: &Exercise) -> Result<()> {
        let _: Exercise = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::EXERCISES)
            .document_id(&exercise.id)
            .object(exercise)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Query exercises. Combining `email` with a date range needs a composite
    /// index on (email, date) outside the emulator.
    async fn query_exercises(&self, query: &ExerciseQuery) -> Result<Vec<Exercise>> {
        let email = query.email.clone();
        let date_range = query.date_range.clone();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISES)
            .filter(move |q| {
                q.for_all([
                    email.as_ref().and_then(|email| q.field("email").eq(email.as_str())),
                    date_range
                        .as_ref()
                        .and_then(|(from, _)| q.field("date").greater_than_or_equal(from.as_str())),
                    date_range
                        .as_ref()
                        .and_then(|(_, to)| q.field("date").less_than_or_equal(to.as_str())),
                ])
            })
            .limit(query.limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
