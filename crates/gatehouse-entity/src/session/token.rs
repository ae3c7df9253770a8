//! OAuth access token held by an authorized session.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens this close to their expiry are already treated as expired.
const EXPIRY_SKEW_SECONDS: i64 = 10;

/// Credential returned by the identity provider after a successful code exchange.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthToken {
    /// Bearer token used against the provider's API.
    pub access_token: String,
    /// Token type reported by the provider (usually `bearer`).
    pub token_type: String,
    /// Refresh token, when the provider issues one.
    pub refresh_token: Option<String>,
    /// Absolute expiry, when the provider reports one.
    pub expiry: Option<DateTime<Utc>>,
}

impl OAuthToken {
    /// Creates a bearer token without expiry.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            refresh_token: None,
            expiry: None,
        }
    }

    /// Sets an absolute expiry.
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Returns `true` if the token is usable at `now`.
    ///
    /// A token without an access token string is never valid. A token
    /// without an expiry never expires.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expiry {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_SKEW_SECONDS) > now,
            None => true,
        }
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("token_type", &self.token_type)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expiry", &self.expiry)
            .finish()
    }
}
