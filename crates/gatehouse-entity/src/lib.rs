//! # gatehouse-entity
//!
//! Domain value objects for Gatehouse. Every struct in this crate derives
//! `Debug`, `Clone`, `Serialize` and `Deserialize`; none of them know how
//! they are stored.

pub mod session;

pub use session::{OAuthToken, Session};
