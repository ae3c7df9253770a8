//! Session store trait.

use async_trait::async_trait;

use gatehouse_core::error::AppError;
use gatehouse_entity::{OAuthToken, Session};

/// Outcome of resolving the session cookie of an incoming request.
#[derive(Debug, Clone)]
pub enum ResolvedSession {
    /// The cookie named a live session, which was renewed.
    Resumed(Session),
    /// No usable cookie; a fresh anonymous session was created.
    Created(Session),
}

impl ResolvedSession {
    /// The resolved session.
    pub fn session(&self) -> &Session {
        match self {
            Self::Resumed(session) | Self::Created(session) => session,
        }
    }

    /// Consumes the outcome and returns the session.
    pub fn into_session(self) -> Session {
        match self {
            Self::Resumed(session) | Self::Created(session) => session,
        }
    }

    /// Returns `true` if the session was created for this request.
    pub fn is_new(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Storage for server-side sessions.
///
/// Every method is safe to call concurrently. Sessions returned by the store
/// are snapshots; mutations go through [`SessionProvider::authorize`].
#[async_trait]
pub trait SessionProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Looks up a live session by id and slides its expiry forward.
    ///
    /// Malformed, unknown, and expired ids all yield `None`; expired entries
    /// are evicted on the way.
    async fn get(&self, id: &str) -> Result<Option<Session>, AppError>;

    /// Creates and stores a new anonymous session.
    ///
    /// Fails with a capacity error when the store is full of live sessions.
    async fn create(&self) -> Result<Session, AppError>;

    /// Records a completed login on a live session.
    async fn authorize(
        &self,
        id: &str,
        user: &str,
        credential: OAuthToken,
    ) -> Result<Session, AppError>;

    /// Removes every expired session. Returns how many were removed.
    async fn sweep(&self) -> Result<usize, AppError>;

    /// Number of sessions currently held, expired ones included.
    async fn len(&self) -> Result<usize, AppError>;

    /// Returns `true` if the store holds no sessions.
    async fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len().await? == 0)
    }

    /// Resumes the session named by a request cookie or creates a new one.
    async fn resolve(&self, id: Option<&str>) -> Result<ResolvedSession, AppError> {
        if let Some(id) = id {
            if let Some(session) = self.get(id).await? {
                return Ok(ResolvedSession::Resumed(session));
            }
        }
        Ok(ResolvedSession::Created(self.create().await?))
    }
}
