//! Database layer.
//!
//! The tracker talks to an [`ExerciseDb`]. [`FirestoreDb`] is the production
//! backend; [`MemoryDb`] keeps everything in process.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Exercise, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const EXERCISES: &str = "exercises";
    /// Email reservations (keyed by lowercased email)
    pub const USER_EMAILS: &str = "user_emails";
}

/// Filter for exercise queries. `None` fields are not filtered on.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseQuery {
    /// Owner email
    pub email: Option<String>,
    /// Inclusive `(from, to)` bounds on the ISO date string
    pub date_range: Option<(String, String)>,
    /// Maximum number of documents returned
    pub limit: u32,
}

/// Document operations used by the exercise tracker.
#[async_trait]
pub trait ExerciseDb: Send + Sync {
    /// Find a user whose email and password both match.
    async fn find_user_by_credentials(&self, email: &str, password: &str)
        -> Result<Option<User>>;

    /// Get a user by ID.
    async fn find_user(&self, id: &str) -> Result<Option<User>>;

    /// Get a user by ID, only if it also has the given email.
    async fn find_user_by_email_and_id(&self, email: &str, id: &str) -> Result<Option<User>> {
        Ok(self.find_user(id).await?.filter(|user| user.email == email))
    }

    /// Store a new user. Fails with `AppError::Conflict` if the email is taken.
    async fn insert_user(&self, user: &User) -> Result<()>;

    /// All users.
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Store a new exercise.
    async fn insert_exercise(&self, exercise: &Exercise) -> Result<()>;

    /// Exercises matching the query, in the backend's natural order.
    async fn query_exercises(&self, query: &ExerciseQuery) -> Result<Vec<Exercise>>;
}
