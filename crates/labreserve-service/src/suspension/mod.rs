//! Suspension policy.

pub mod service;

pub use service::SuspensionService;
