//! PostgreSQL store implementations.

pub mod block;
pub mod reservation;
pub mod resource;
pub mod violation;

pub use block::PgBlockStore;
pub use reservation::PgReservationStore;
pub use resource::PgResourceStore;
pub use violation::PgViolationStore;
