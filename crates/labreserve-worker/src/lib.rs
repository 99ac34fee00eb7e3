//! # labreserve-worker
//!
//! The recurring sweep: expires overdue sessions, warns occupants once
//! before expiry, and lifts timed suspensions. [`Sweep`] holds the pass
//! logic; [`SweepScheduler`] drives it on a fixed cadence.

pub mod scheduler;
pub mod sweep;

pub use scheduler::SweepScheduler;
pub use sweep::Sweep;
