//! # labreserve-entity
//!
//! Domain entity models for LabReserve: resources, reservations, block
//! reservations, violations, and requester roles. Models derive
//! `sqlx::FromRow` so the Postgres stores can map rows directly.

pub mod block;
pub mod requester;
pub mod reservation;
pub mod resource;
pub mod violation;

pub use block::{BlockGroup, BlockReservation, BlockStatus};
pub use requester::Role;
pub use reservation::{Reservation, ReservationStatus};
pub use resource::{Condition, Connectivity, Occupancy, Resource};
pub use violation::{Severity, Violation, ViolationStatus};
