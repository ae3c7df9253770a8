//! Route definitions for the Gatehouse HTTP server.
//!
//! Browser routes run behind the session cookie middleware; the health
//! route does not, so probes never create sessions.

use std::time::Duration;

use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let browser_routes = Router::new()
        .merge(index_routes())
        .merge(oauth_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::session_cookie,
        ));

    Router::new()
        .merge(browser_routes)
        .merge(health_routes())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Landing page
fn index_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::index::index))
}

/// Login initiation and provider callback
fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route("/oauth", get(handlers::oauth::login))
        .route("/oauth/callback", get(handlers::oauth::callback))
}

/// Liveness probe
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
