//! Server-side session storage.

pub mod cleanup;
pub mod id;
pub mod memory;
pub mod provider;

pub use cleanup::SessionSweeper;
pub use id::SessionIdGenerator;
pub use memory::MemorySessionStore;
pub use provider::{ResolvedSession, SessionProvider};

/// Short prefix of a session id, safe to put in logs.
pub fn redact(id: &str) -> &str {
    id.get(..6).unwrap_or(id)
}
