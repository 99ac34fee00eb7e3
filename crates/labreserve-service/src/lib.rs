//! # labreserve-service
//!
//! Business logic for LabReserve. Each service owns one concern:
//!
//! - [`RegistryService`] — the fixed set of bookable resources.
//! - [`LedgerService`] — the reservation state machine.
//! - [`BlockService`] — bulk claims for faculty groups.
//! - [`SuspensionService`] — violations and their booking consequences.
//!
//! Services mutate state through store traits and publish every state
//! change on the notification bus. Check-then-write sequences are
//! serialized by per-id lock maps ([`locks`]); the requester lock is
//! always acquired before any resource lock.

pub mod block;
pub mod context;
pub mod ledger;
pub mod locks;
mod publish;
pub mod registry;
pub mod suspension;

pub use block::BlockService;
pub use context::RequestContext;
pub use ledger::{LedgerService, ReservationTicket};
pub use locks::{LockMap, ReservationLocks};
pub use registry::RegistryService;
pub use suspension::SuspensionService;
