//! Bookable resource entity.

pub mod model;
pub mod status;

pub use model::Resource;
pub use status::{Condition, Connectivity, Occupancy};
