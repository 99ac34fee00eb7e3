//! Shared value types.

pub mod topic;

pub use topic::Topic;
