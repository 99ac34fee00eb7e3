//! # labreserve-realtime
//!
//! The in-process notification bus. Services publish [`Notification`]s
//! on named topics; delivery layers (WebSocket gateways, dashboards,
//! tests) subscribe per topic and fan out as they see fit.
//!
//! [`Notification`]: labreserve_core::events::Notification

pub mod bus;

pub use bus::NotificationBus;
