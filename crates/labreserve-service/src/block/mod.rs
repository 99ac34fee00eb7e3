//! Block (bulk) reservation allocator.

pub mod service;

pub use service::BlockService;
