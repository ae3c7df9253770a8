//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use gatehouse_auth::{IdentityProvider, SessionProvider};
use gatehouse_core::config::AppConfig;
use gatehouse_core::traits::Clock;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Server-side session store
    pub sessions: Arc<dyn SessionProvider>,
    /// OAuth identity provider
    pub identity: Arc<dyn IdentityProvider>,
    /// Time source shared with the session store
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates the application state.
    pub fn new(
        config: AppConfig,
        sessions: Arc<dyn SessionProvider>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            sessions,
            identity,
            clock,
        }
    }
}
