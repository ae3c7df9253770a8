//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::OAuthToken;

/// Server-side record binding an opaque cookie value to one browser's
/// authentication state.
///
/// Values handed out by the session store are snapshots: changing a field
/// here does not change the stored session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier, also the cookie value.
    pub id: String,
    /// The session is live while this is strictly in the future.
    pub expires_at: DateTime<Utc>,
    /// Login of the authenticated user; empty until the handshake completes.
    pub user: String,
    /// Credential from the identity provider; absent until the handshake completes.
    pub credential: Option<OAuthToken>,
}

impl Session {
    /// Creates an anonymous session.
    pub fn new(id: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            expires_at,
            user: String::new(),
            credential: None,
        }
    }

    /// Returns `true` if the session is still live at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Returns `true` if the session is logged in at `now`.
    pub fn is_authorized_at(&self, now: DateTime<Utc>) -> bool {
        if self.user.is_empty() {
            return false;
        }
        match &self.credential {
            Some(credential) => credential.is_valid(now),
            None => false,
        }
    }

    /// Returns `true` if the session is logged in right now.
    pub fn is_authorized(&self) -> bool {
        self.is_authorized_at(Utc::now())
    }

    /// Seconds until expiry at `now`, floored at zero.
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}
