//! Session id generation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::warn;

use gatehouse_core::constants::MAX_ID_ATTEMPTS;
use gatehouse_core::error::AppError;

/// Produces unpredictable session ids of a fixed length.
///
/// Each id is `id_length / 4 * 3` random bytes encoded with the standard
/// base64 alphabet, so it is exactly `id_length` characters with no padding.
pub struct SessionIdGenerator {
    rng: Box<dyn RngCore + Send>,
    id_length: usize,
}

impl SessionIdGenerator {
    /// Creates a generator seeded from operating system entropy.
    pub fn new(id_length: usize) -> Self {
        Self::with_rng(id_length, StdRng::from_entropy())
    }

    /// Creates a generator drawing from the given source.
    pub fn with_rng(id_length: usize, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Box::new(rng),
            id_length,
        }
    }

    /// Length of the ids this generator produces.
    pub fn id_length(&self) -> usize {
        self.id_length
    }

    /// Draws a fresh id for which `is_taken` returns `false`.
    ///
    /// Gives up with an internal error after a bounded number of collisions.
    pub fn generate<F>(&mut self, is_taken: F) -> Result<String, AppError>
    where
        F: Fn(&str) -> bool,
    {
        let mut bytes = vec![0u8; self.id_length / 4 * 3];

        for attempt in 1..=MAX_ID_ATTEMPTS {
            self.rng.fill_bytes(&mut bytes);
            let id = STANDARD.encode(&bytes);
            if !is_taken(&id) {
                return Ok(id);
            }
            warn!(attempt, "Session id collision");
        }

        Err(AppError::internal(format!(
            "Session id space exhausted after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    /// Returns `true` if `id` could have been produced by a generator of
    /// the given length.
    pub fn is_well_formed(id: &str, id_length: usize) -> bool {
        id.len() == id_length
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
    }
}

impl std::fmt::Debug for SessionIdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIdGenerator")
            .field("id_length", &self.id_length)
            .finish()
    }
}
