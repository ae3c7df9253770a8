//! # gatehouse-api
//!
//! HTTP layer for Gatehouse built on Axum.
//!
//! Provides the browser-facing pages, the OAuth login and callback
//! endpoints, the session cookie middleware, and error mapping.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod templates;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
