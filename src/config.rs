//! Store configuration loaded from environment variables.

use std::env;

/// Log limit applied when a caller does not pass one.
pub const DEFAULT_LOG_LIMIT: u32 = 9999;

/// Largest log limit sent to the database. Firestore encodes limits as
/// `i32`, so anything above this would go over the wire negative.
pub const MAX_LOG_LIMIT: u32 = i32::MAX as u32;

/// Store configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project holding the Firestore database
    pub gcp_project_id: String,
    /// Maximum number of log entries returned when no limit is given
    pub default_log_limit: u32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            default_log_limit: DEFAULT_LOG_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first if present. Set `FIRESTORE_EMULATOR_HOST`
    /// to talk to a local emulator instead of Cloud Firestore.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let default_log_limit = match env::var("EXERCISE_LOG_DEFAULT_LIMIT") {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(limit) if limit > 0 => limit.min(MAX_LOG_LIMIT),
                _ => return Err(ConfigError::Invalid("EXERCISE_LOG_DEFAULT_LIMIT", raw)),
            },
            Err(_) => DEFAULT_LOG_LIMIT,
        };

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            default_log_limit,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share one test so they never race on the same variable.
    #[test]
    fn test_config_from_env() {
        env::set_var("GCP_PROJECT_ID", "test_project");
        env::set_var("EXERCISE_LOG_DEFAULT_LIMIT", "25");

        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.gcp_project_id, "test_project");
        assert_eq!(config.default_log_limit, 25);

        env::set_var("EXERCISE_LOG_DEFAULT_LIMIT", "4294967295");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.default_log_limit, MAX_LOG_LIMIT);

        env::set_var("EXERCISE_LOG_DEFAULT_LIMIT", "lots");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid("EXERCISE_LOG_DEFAULT_LIMIT", _)
        ));

        env::remove_var("EXERCISE_LOG_DEFAULT_LIMIT");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.default_log_limit, DEFAULT_LOG_LIMIT);
    }
}
