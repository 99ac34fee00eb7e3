//! Reservation ledger.

pub mod service;

pub use service::{LedgerService, ReservationTicket};
