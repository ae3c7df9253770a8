//! Session domain entities.

pub mod model;
pub mod token;

pub use model::Session;
pub use token::OAuthToken;
