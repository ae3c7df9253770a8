//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files plus environment overrides. Each sub-module represents one
//! configuration section, and every section falls back to its defaults when
//! absent.

pub mod app;
pub mod logging;
pub mod oauth;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::logging::LoggingConfig;
pub use self::oauth::OAuthConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Session store settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// OAuth identity provider settings.
    #[serde(default)]
    pub oauth: OAuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml`, the environment overlay
    /// `config/{env}.toml` and environment variables prefixed with
    /// `GATEHOUSE` (for example `GATEHOUSE__OAUTH__CLIENT_ID`). Missing files
    /// are skipped. `GATEHOUSE__OAUTH__SCOPES` takes a comma-separated list.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(Self::environment())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("GATEHOUSE")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("oauth.scopes")
    }

    /// Validate the sections the server cannot start without.
    pub fn validate(&self) -> Result<(), AppError> {
        self.session.validate()?;
        self.oauth.validate()?;
        Ok(())
    }
}
