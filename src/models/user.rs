//! User model for storage and API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User document stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Generated user ID (also used as document ID)
    #[serde(rename = "_id")]
    pub id: String,
    /// Lowercased email address, unique across users
    pub email: String,
    /// Plaintext password
    pub password: String,
    /// Description of the most recently recorded exercise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Duration of the most recently recorded exercise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Day string of the most recently recorded exercise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl User {
    /// Build a fresh user document from validated input.
    pub fn new(input: NewUser) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: input.email,
            password: input.password,
            description: None,
            duration: None,
            date: None,
        }
    }

    /// Copy of this user without the last-exercise fields, as persisted.
    pub fn stored(&self) -> Self {
        Self {
            description: None,
            duration: None,
            date: None,
            ..self.clone()
        }
    }
}

/// Candidate user, checked before it is written.
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Minimum password length is 8 characters"))]
    pub password: String,
}

impl NewUser {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: normalize_email(email),
            password: password.to_string(),
        }
    }
}

/// Emails are stored and looked up in lowercase.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_lowercases_email() {
        let input = NewUser::new("Runner@Example.COM", "password123");
        assert_eq!(input.email, "runner@example.com");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let input = NewUser::new("not-an-email", "password123");
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_short_password_rejected() {
        let input = NewUser::new("runner@example.com", "short");
        let errors = input.validate().unwrap_err();
        let password_errors = errors.field_errors();
        let message = password_errors["password"][0].message.as_deref();
        assert_eq!(message, Some("Minimum password length is 8 characters"));
    }

    #[test]
    fn test_password_length_counts_characters() {
        // 8 characters, more than 8 bytes
        let input = NewUser::new("runner@example.com", "pässwörd");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_serialized_user_omits_empty_exercise_fields() {
        let user = User::new(NewUser::new("runner@example.com", "password123"));
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["_id"], serde_json::Value::String(user.id.clone()));
        assert!(json.get("description").is_none());
        assert!(json.get("duration").is_none());
        assert!(json.get("date").is_none());
    }

    #[test]
    fn test_stored_drops_last_exercise_fields() {
        let mut user = User::new(NewUser::new("runner@example.com", "password123"));
        user.description = Some("Run".to_string());
        user.duration = Some(30.0);
        user.date = Some("Wed Jan 15 2020".to_string());

        let stored = user.stored();
        assert_eq!(stored.id, user.id);
        assert_eq!(stored.description, None);
        assert_eq!(stored.duration, None);
        assert_eq!(stored.date, None);
    }
}
