//! # gatehouse-auth
//!
//! Session management and login for Gatehouse.
//!
//! ## Modules
//!
//! - `session`: session store trait, in-memory store, id generation, and expiry sweeping
//! - `oauth`: identity provider trait, GitHub client, and OAuth state derivation

pub mod oauth;
pub mod session;

pub use oauth::{GitHubProvider, IdentityProvider, oauth_state, verify_state};
pub use session::{
    MemorySessionStore, ResolvedSession, SessionIdGenerator, SessionProvider, SessionSweeper,
};
