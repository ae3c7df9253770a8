//! OAuth identity provider configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// OAuth client configuration. Defaults point at GitHub.
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// OAuth application client id.
    #[serde(default)]
    pub client_id: String,
    /// OAuth application client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Callback URL registered with the provider.
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    /// Provider authorization endpoint.
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,
    /// Provider token endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Endpoint returning the authenticated user.
    #[serde(default = "default_user_api_url")]
    pub user_api_url: String,
    /// Requested scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Timeout for calls to the provider in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

impl OAuthConfig {
    /// Builds the callback URL for a public hostname.
    pub fn callback_for_host(hostname: &str) -> String {
        format!("https://{hostname}/oauth/callback")
    }

    /// Check that the client credentials are present.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.client_id.trim().is_empty() {
            return Err(AppError::configuration("oauth.client_id is not set"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(AppError::configuration("oauth.client_secret is not set"));
        }
        if self.redirect_url.trim().is_empty() {
            return Err(AppError::configuration("oauth.redirect_url is not set"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_url", &self.redirect_url)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("user_api_url", &self.user_api_url)
            .field("scopes", &self.scopes)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: default_redirect_url(),
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            user_api_url: default_user_api_url(),
            scopes: Vec::new(),
            http_timeout_seconds: default_http_timeout(),
        }
    }
}

fn default_redirect_url() -> String {
    "https://localhost/oauth/callback".to_string()
}

fn default_authorize_url() -> String {
    "https://github.com/login/oauth/authorize".to_string()
}

fn default_token_url() -> String {
    "https://github.com/login/oauth/access_token".to_string()
}

fn default_user_api_url() -> String {
    "https://api.github.com/user".to_string()
}

fn default_http_timeout() -> u64 {
    10
}
