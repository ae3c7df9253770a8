//! In-memory session store using a Tokio mutex for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use gatehouse_core::config::SessionConfig;
use gatehouse_core::error::AppError;
use gatehouse_core::traits::{Clock, SystemClock};
use gatehouse_entity::{OAuthToken, Session};

use super::id::SessionIdGenerator;
use super::provider::SessionProvider;
use super::redact;

/// Internal state for the memory-based session store.
#[derive(Debug)]
struct InnerState {
    /// Sessions keyed by id.
    sessions: HashMap<String, Session>,
    /// Id source; lives under the same lock as the map.
    ids: SessionIdGenerator,
}

/// In-memory session store.
///
/// All reads and writes go through one Tokio mutex, so a lookup, its renewal,
/// and a concurrent creation never interleave. State is lost on restart.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
    /// Time source for every expiry decision.
    clock: Arc<dyn Clock>,
    /// Lifetime granted on creation and on every lookup.
    ttl: Duration,
    /// Maximum number of live sessions.
    max_sessions: usize,
    /// Expected length of a session id.
    id_length: usize,
}

impl MemorySessionStore {
    /// Creates a store reading the system clock.
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a store reading the given clock.
    pub fn with_clock(config: &SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_parts(config, clock, SessionIdGenerator::new(config.id_length))
    }

    /// Creates a store from explicit collaborators.
    pub fn with_parts(
        config: &SessionConfig,
        clock: Arc<dyn Clock>,
        ids: SessionIdGenerator,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(InnerState {
                sessions: HashMap::new(),
                ids,
            })),
            clock,
            ttl: config.ttl(),
            max_sessions: config.max_sessions,
            id_length: config.id_length,
        }
    }

    fn evict_expired(sessions: &mut HashMap<String, Session>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| session.is_live_at(now));
        before - sessions.len()
    }
}

#[async_trait]
impl SessionProvider for MemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<Session>, AppError> {
        if !SessionIdGenerator::is_well_formed(id, self.id_length) {
            debug!(len = id.len(), "Ignoring malformed session id");
            return Ok(None);
        }

        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let sessions = &mut state.sessions;

        let Some(session) = sessions.get_mut(id) else {
            return Ok(None);
        };

        if !session.is_live_at(now) {
            sessions.remove(id);
            info!(session = %redact(id), "Evicted expired session");
            return Ok(None);
        }

        session.expires_at = session.expires_at.max(now + self.ttl);
        Ok(Some(session.clone()))
    }

    async fn create(&self) -> Result<Session, AppError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let InnerState { sessions, ids } = &mut *state;

        if sessions.len() >= self.max_sessions {
            let evicted = Self::evict_expired(sessions, now);
            if evicted > 0 {
                debug!(evicted, "Evicted expired sessions to make room");
            }
            if sessions.len() >= self.max_sessions {
                warn!(
                    max_sessions = self.max_sessions,
                    "Session store is full"
                );
                return Err(AppError::capacity(format!(
                    "Session store is full ({} live sessions)",
                    self.max_sessions
                )));
            }
        }

        let id = ids.generate(|candidate| sessions.contains_key(candidate))?;
        let session = Session::new(id.clone(), now + self.ttl);
        sessions.insert(id, session.clone());

        debug!(session = %redact(&session.id), live = sessions.len(), "Created session");
        Ok(session)
    }

    async fn authorize(
        &self,
        id: &str,
        user: &str,
        credential: OAuthToken,
    ) -> Result<Session, AppError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;

        let session = state
            .sessions
            .get_mut(id)
            .filter(|session| session.is_live_at(now))
            .ok_or_else(|| AppError::not_found("Session expired or unknown"))?;

        session.user = user.to_string();
        session.credential = Some(credential);

        info!(session = %redact(id), user = %user, "Session authorized");
        Ok(session.clone())
    }

    async fn sweep(&self) -> Result<usize, AppError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        Ok(Self::evict_expired(&mut state.sessions, now))
    }

    async fn len(&self) -> Result<usize, AppError> {
        Ok(self.state.lock().await.sessions.len())
    }
}
