//! Landing page handler.

use askama::Template;
use axum::extract::State;
use axum::response::Html;

use gatehouse_core::error::{AppError, ErrorKind};

use crate::error::ApiError;
use crate::extractors::CurrentSession;
use crate::state::AppState;
use crate::templates::IndexTemplate;

/// GET /
pub async fn index(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Html<String>, ApiError> {
    let page = IndexTemplate::for_session(&session, state.clock.now(), state.identity.name());
    let html = page.render().map_err(|e| {
        AppError::with_source(ErrorKind::Internal, "Failed to render index page", e)
    })?;
    Ok(Html(html))
}
