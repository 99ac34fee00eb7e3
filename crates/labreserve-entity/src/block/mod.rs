//! Block (bulk) reservation entity.

pub mod model;

pub use model::{BlockGroup, BlockReservation, BlockStatus};
