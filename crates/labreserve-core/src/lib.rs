//! # labreserve-core
//!
//! Core crate for LabReserve. Contains configuration schemas, domain
//! events, bus topics, collaborator traits, and the unified error system.
//!
//! This crate has **no** internal dependencies on other LabReserve crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
