use std::path::PathBuf;

use chrono::Duration;

use crate::errors::{AuthError, AuthResult};

/// Client configuration, resolved once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the kudos API, no trailing slash.
    pub api_url: String,
    /// Directory holding the local store and cookie jar files.
    pub state_dir: PathBuf,
    /// Lifetime of the auth cookie.
    pub cookie_max_age: Duration,
}

impl Config {
    pub fn from_env() -> AuthResult<Self> {
        let api_url = std::env::var("KUDOS_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string())
            .trim_end_matches('/')
            .to_string();

        let state_dir = std::env::var("KUDOS_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_state_dir());

        let cookie_max_age = match std::env::var("KUDOS_COOKIE_MAX_AGE_SECS") {
            Ok(raw) => {
                let secs: i64 = raw.parse().map_err(|_| {
                    AuthError::internal("KUDOS_COOKIE_MAX_AGE_SECS must be a valid integer")
                })?;
                Duration::seconds(secs)
            }
            Err(_) => Duration::days(7),
        };

        Ok(Self {
            api_url,
            state_dir,
            cookie_max_age,
        })
    }
}

fn default_state_dir() -> PathBuf {
    std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".kudos"))
        .unwrap_or_else(|_| PathBuf::from(".kudos"))
}
