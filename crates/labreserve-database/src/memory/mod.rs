//! In-memory store implementations.
//!
//! Backed by `DashMap`; used by the integration tests and by single-node
//! demo runs that have no PostgreSQL available.

pub mod block;
pub mod reservation;
pub mod resource;
pub mod violation;

pub use block::MemoryBlockStore;
pub use reservation::MemoryReservationStore;
pub use resource::MemoryResourceStore;
pub use violation::MemoryViolationStore;
