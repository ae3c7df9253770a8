//! Login through an external OAuth identity provider.

pub mod github;
pub mod provider;
pub mod state;

pub use github::GitHubProvider;
pub use provider::IdentityProvider;
pub use state::{oauth_state, verify_state};
