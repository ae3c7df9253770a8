//! Process-wide constants.

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE_NAME: &str = "_session_";

/// Upper bound on id draws before session creation gives up.
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Minimum session id length in characters (18 random bytes, 144 bits).
pub const MIN_SESSION_ID_LENGTH: usize = 24;

/// User-Agent sent to the identity provider's API.
pub const USER_AGENT: &str = concat!("gatehouse/", env!("CARGO_PKG_VERSION"));

/// Longest accepted session lifetime in hours (100 years).
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365 * 100;
