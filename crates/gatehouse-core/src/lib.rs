//! # gatehouse-core
//!
//! Core crate for Gatehouse. Contains configuration schemas, the unified
//! error system, the clock abstraction used for every expiry decision, and
//! a handful of process-wide constants.
//!
//! This crate has **no** internal dependencies on other Gatehouse crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
