//! # labreserve-database
//!
//! Store traits for the four persisted collections (resources,
//! reservations, block reservations, violations), a PostgreSQL
//! implementation for production, and an in-memory implementation for
//! tests and single-node demos.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod stores;

pub use connection::DatabasePool;
pub use stores::{BlockStore, ReservationStore, ResourceStore, ViolationStore};
