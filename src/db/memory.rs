//! In-process document store.
//!
//! Same contract as the Firestore backend, including the unique email
//! index. Clones share the same collections.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::db::{ExerciseDb, ExerciseQuery};
use crate::error::{AppError, Result};
use crate::models::{Exercise, User};

#[derive(Default)]
struct Collections {
    users: DashMap<String, User>,
    /// email -> user ID
    user_emails: DashMap<String, String>,
    /// insertion sequence -> exercise
    exercises: DashMap<u64, Exercise>,
    next_exercise_seq: AtomicU64,
}

/// In-memory database.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Collections>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored exercises.
    pub fn exercise_count(&self) -> usize {
        self.inner.exercises.len()
    }
}

#[async_trait]
impl ExerciseDb for MemoryDb {
    async fn find_user_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>> {
        Ok(self
            .inner
            .users
            .iter()
            .find(|user| user.email == email && user.password == password)
            .map(|user| user.value().clone()))
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.inner.users.get(id).map(|user| user.value().clone()))
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        if self.inner.users.contains_key(&user.id) {
            return Err(AppError::Conflict(format!("user {}", user.id)));
        }

        match self.inner.user_emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!("email {}", user.email))),
            Entry::Vacant(slot) => {
                self.inner.users.insert(user.id.clone(), user.stored());
                slot.insert(user.id.clone());
                Ok(())
            }
        }
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self
            .inner
            .users
            .iter()
            .map(|user| user.value().clone())
            .collect())
    }

    async fn insert_exercise(&self, exercise: &Exercise) -> Result<()> {
        let seq = self.inner.next_exercise_seq.fetch_add(1, Ordering::SeqCst);
        self.inner.exercises.insert(seq, exercise.clone());
        Ok(())
    }

    async fn query_exercises(&self, query: &ExerciseQuery) -> Result<Vec<Exercise>> {
        let mut matched: Vec<(u64, Exercise)> = self
            .inner
            .exercises
            .iter()
            .filter(|entry| matches_query(entry.value(), query))
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        matched.sort_by_key(|(seq, _)| *seq);

        Ok(matched
            .into_iter()
            .take(query.limit as usize)
            .map(|(_, exercise)| exercise)
            .collect())
    }
}

fn matches_query(exercise: &Exercise, query: &ExerciseQuery) -> bool {
    if let Some(email) = &query.email {
        if &exercise.email != email {
            return false;
        }
    }

    match (&query.date_range, &exercise.date) {
        (None, _) => true,
        (Some((from, to)), Some(date)) => date >= from && date <= to,
        // Missing field never satisfies a range filter
        (Some(_), None) => false,
    }
}
