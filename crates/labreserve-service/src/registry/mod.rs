//! Resource registry.

pub mod service;

pub use service::RegistryService;
