//! Identity provider trait.

use async_trait::async_trait;

use gatehouse_core::AppResult;
use gatehouse_entity::OAuthToken;

/// An OAuth 2.0 authorization-code identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Builds the URL the browser is sent to, carrying `state` through the
    /// round trip.
    fn authorize_url(&self, state: &str) -> AppResult<String>;

    /// Exchanges an authorization code for a credential.
    async fn exchange_code(&self, code: &str) -> AppResult<OAuthToken>;

    /// Fetches the login name of the user behind a credential.
    async fn fetch_login(&self, token: &OAuthToken) -> AppResult<String>;
}
