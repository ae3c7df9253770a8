//! OAuth login handlers.

use axum::extract::{Query, State};
use axum::response::Redirect;
use serde::Deserialize;
use tracing::{info, warn};

use gatehouse_auth::{oauth_state, verify_state};
use gatehouse_core::error::AppError;
use gatehouse_entity::Session;

use crate::error::ApiError;
use crate::extractors::CurrentSession;
use crate::state::AppState;

/// Query parameters the provider appends to the callback URL.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub code: String,
}

/// GET /oauth
///
/// Sends the browser to the identity provider, or home when the session is
/// already logged in.
pub async fn login(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Redirect, ApiError> {
    if session.is_authorized_at(state.clock.now()) {
        info!(user = %session.user, "Already authorized");
        return Ok(Redirect::temporary("/"));
    }

    let url = state.identity.authorize_url(&oauth_state(&session.id))?;
    Ok(Redirect::temporary(&url))
}

/// GET /oauth/callback
///
/// Completes the handshake. Every outcome redirects home; failures are
/// only logged.
pub async fn callback(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    match complete_login(&state, &session, &params).await {
        Ok(user) => info!(user = %user, provider = state.identity.name(), "Logged in"),
        Err(e) => warn!(error = %e, provider = state.identity.name(), "OAuth callback failed"),
    }
    Redirect::temporary("/")
}

async fn complete_login(
    state: &AppState,
    session: &Session,
    params: &CallbackParams,
) -> Result<String, AppError> {
    if !verify_state(&session.id, &params.state) {
        return Err(AppError::authentication(
            "OAuth state does not match the session",
        ));
    }

    let token = state.identity.exchange_code(&params.code).await?;
    if !token.is_valid(state.clock.now()) {
        return Err(AppError::authentication(
            "Identity provider returned an unusable token",
        ));
    }

    let user = state.identity.fetch_login(&token).await?;
    state.sessions.authorize(&session.id, &user, token).await?;
    Ok(user)
}
