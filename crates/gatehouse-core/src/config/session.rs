//! Session store configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_SESSION_TTL_HOURS, MIN_SESSION_ID_LENGTH};
use crate::error::AppError;

/// Session store configuration.
///
/// All values are fixed at process start; the store does not support
/// reconfiguration while running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Length of a session id in base64 characters. Must be a multiple of 4.
    #[serde(default = "default_id_length")]
    pub id_length: usize,
    /// Session lifetime in hours, renewed on every lookup.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Maximum number of live sessions held at once.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Interval between expired-session sweeps in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
    /// Whether the session cookie carries the `Secure` attribute.
    #[serde(default)]
    pub secure_cookie: bool,
}

impl SessionConfig {
    /// Session lifetime as a chrono duration, capped at
    /// [`MAX_SESSION_TTL_HOURS`].
    pub fn ttl(&self) -> Duration {
        let hours = self.ttl_hours.min(MAX_SESSION_TTL_HOURS);
        i64::try_from(hours).map_or_else(|_| Duration::days(365 * 100), Duration::hours)
    }

    /// Check the values the store relies on.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.id_length % 4 != 0 {
            return Err(AppError::configuration(format!(
                "session.id_length must be a multiple of 4, got {}",
                self.id_length
            )));
        }
        if self.id_length < MIN_SESSION_ID_LENGTH {
            return Err(AppError::configuration(format!(
                "session.id_length must be at least {MIN_SESSION_ID_LENGTH}, got {}",
                self.id_length
            )));
        }
        if self.max_sessions == 0 {
            return Err(AppError::configuration(
                "session.max_sessions must be greater than zero",
            ));
        }
        if self.ttl_hours == 0 {
            return Err(AppError::configuration(
                "session.ttl_hours must be greater than zero",
            ));
        }
        if self.ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(AppError::configuration(format!(
                "session.ttl_hours must be at most {MAX_SESSION_TTL_HOURS}, got {}",
                self.ttl_hours
            )));
        }
        if self.cleanup_interval_seconds == 0 {
            return Err(AppError::configuration(
                "session.cleanup_interval_seconds must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            id_length: default_id_length(),
            ttl_hours: default_ttl_hours(),
            max_sessions: default_max_sessions(),
            cleanup_interval_seconds: default_cleanup_interval(),
            secure_cookie: false,
        }
    }
}

fn default_id_length() -> usize {
    32
}

fn default_ttl_hours() -> u64 {
    7 * 24
}

fn default_max_sessions() -> usize {
    4096
}

fn default_cleanup_interval() -> u64 {
    300
}
