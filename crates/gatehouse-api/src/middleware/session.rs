//! Session cookie middleware.
//!
//! Binds every browser request to a server-side session: resumes the one
//! named by the `_session_` cookie or starts a new one, exposes it to
//! handlers as [`CurrentSession`], and refreshes the cookie on the response.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

use gatehouse_auth::session::redact;
use gatehouse_core::constants::SESSION_COOKIE_NAME;
use gatehouse_entity::Session;

use crate::extractors::CurrentSession;
use crate::state::AppState;

/// Resolves the request's session and sets the session cookie.
///
/// When the store is full the request proceeds without a session and no
/// cookie is written; handlers needing one reject it.
pub async fn session_cookie(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_id = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string());

    let resolved = match state.sessions.resolve(cookie_id.as_deref()).await {
        Ok(resolved) => resolved,
        Err(e) if e.is_capacity() => {
            warn!(error = %e, "No session for request");
            return next.run(request).await;
        }
        Err(e) => {
            error!(error = %e, "Session lookup failed");
            return next.run(request).await;
        }
    };

    if resolved.is_new() {
        debug!(session = %redact(&resolved.session().id), "New session");
    } else {
        debug!(session = %redact(&resolved.session().id), "Resumed session");
    }

    let session = resolved.into_session();
    let cookie = build_session_cookie(
        &session,
        state.clock.now(),
        state.config.session.secure_cookie,
    );
    request.extensions_mut().insert(CurrentSession(session));

    let response = next.run(request).await;
    (jar.add(cookie), response).into_response()
}

/// Builds the `Set-Cookie` value for a session.
pub fn build_session_cookie(session: &Session, now: DateTime<Utc>, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE_NAME, session.id.clone()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(session.seconds_remaining(now)))
        .build();

    if let Ok(expires) = time::OffsetDateTime::from_unix_timestamp(session.expires_at.timestamp()) {
        cookie.set_expires(expires);
    }

    cookie
}
