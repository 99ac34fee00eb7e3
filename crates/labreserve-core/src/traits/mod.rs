//! Traits at the boundaries to external collaborators.

pub mod notifier;

pub use notifier::{BlockNotifier, TracingBlockNotifier};
