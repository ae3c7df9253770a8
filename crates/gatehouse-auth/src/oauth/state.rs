//! OAuth `state` parameter derivation.
//!
//! The state sent to the provider is a digest of the session id, so the
//! callback can be tied to the session that started the login without the
//! cookie value ever leaving the server.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// Derives the OAuth state for a session.
pub fn oauth_state(session_id: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(session_id.as_bytes()))
}

/// Returns `true` if `state` was derived from `session_id`.
pub fn verify_state(session_id: &str, state: &str) -> bool {
    let expected = oauth_state(session_id);
    if expected.len() != state.len() {
        return false;
    }
    expected
        .bytes()
        .zip(state.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
