//! GitHub OAuth client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use gatehouse_core::config::OAuthConfig;
use gatehouse_core::constants::USER_AGENT;
use gatehouse_core::AppResult;
use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::traits::{Clock, SystemClock};
use gatehouse_entity::OAuthToken;

use super::provider::IdentityProvider;

/// Body sent to the token endpoint.
#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

/// Token endpoint response. GitHub reports failures with a 200 status and
/// an `error` field.
#[derive(Debug, Default, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

impl TokenResponse {
    fn into_token(self, now: DateTime<Utc>) -> AppResult<OAuthToken> {
        if let Some(error) = self.error {
            let description = self.error_description.unwrap_or_default();
            return Err(AppError::external_service(format!(
                "Token exchange rejected: {error} {description}"
            )));
        }

        let access_token = self
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::external_service("Token response carried no access token"))?;

        Ok(OAuthToken {
            access_token,
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_string()),
            refresh_token: self.refresh_token,
            expiry: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| now + chrono::Duration::seconds(secs)),
        })
    }
}

/// Subset of the GitHub user resource.
#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

/// Identity provider backed by GitHub OAuth apps.
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    client: reqwest::Client,
    config: OAuthConfig,
    clock: Arc<dyn Clock>,
}

impl GitHubProvider {
    /// Creates a provider reading the system clock.
    pub fn new(config: OAuthConfig) -> Result<Self, AppError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a provider reading the given clock for token expiry.
    pub fn with_clock(config: OAuthConfig, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            config,
            clock,
        })
    }
}

fn request_failed(what: &str, e: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::ExternalService,
        format!("{what} request failed: {e}"),
        e,
    )
}

#[async_trait]
impl IdentityProvider for GitHubProvider {
    fn name(&self) -> &str {
        "github"
    }

    fn authorize_url(&self, state: &str) -> AppResult<String> {
        let scope = self.config.scopes.join(" ");
        let mut params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("response_type", "code"),
            ("state", state),
        ];
        if !scope.is_empty() {
            params.push(("scope", scope.as_str()));
        }

        let url = reqwest::Url::parse_with_params(&self.config.authorize_url, &params).map_err(
            |e| AppError::with_source(ErrorKind::Configuration, "Invalid oauth.authorize_url", e),
        )?;
        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> AppResult<OAuthToken> {
        if code.is_empty() {
            return Err(AppError::validation("Authorization code is empty"));
        }

        debug!(provider = self.name(), "Exchanging authorization code");

        let response = self
            .client
            .post(&self.config.token_url)
            .header(ACCEPT, "application/json")
            .json(&TokenRequest {
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                code,
                redirect_uri: &self.config.redirect_url,
            })
            .send()
            .await
            .map_err(|e| request_failed("Token", e))?
            .error_for_status()
            .map_err(|e| request_failed("Token", e))?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| request_failed("Token", e))?;

        body.into_token(self.clock.now()).inspect_err(|e| {
            warn!(provider = self.name(), error = %e, "Token exchange failed");
        })
    }

    async fn fetch_login(&self, token: &OAuthToken) -> AppResult<String> {
        let user: GitHubUser = self
            .client
            .get(&self.config.user_api_url)
            .header(ACCEPT, "application/vnd.github+json")
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| request_failed("User", e))?
            .error_for_status()
            .map_err(|e| request_failed("User", e))?
            .json()
            .await
            .map_err(|e| request_failed("User", e))?;

        if user.login.is_empty() {
            return Err(AppError::external_service("User response carried no login"));
        }
        Ok(user.login)
    }
}
