//! `CurrentSession` extractor: the session the cookie middleware attached
//! to the request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use gatehouse_core::error::AppError;
use gatehouse_entity::Session;

use crate::error::ApiError;

/// Session bound to the current request.
///
/// Rejects with `422 Unprocessable Entity` when the middleware could not
/// attach one, which happens when the store is full.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl std::ops::Deref for CurrentSession {
    type Target = Session;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .ok_or_else(|| AppError::missing_session("Request has no session").into())
    }
}
