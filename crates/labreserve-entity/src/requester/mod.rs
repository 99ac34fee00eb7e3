//! Requester identity types.

pub mod role;

pub use role::Role;
