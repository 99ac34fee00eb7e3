//! Violation entity.

pub mod model;
pub mod severity;

pub use model::{Violation, ViolationStatus};
pub use severity::Severity;
