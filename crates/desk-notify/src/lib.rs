//! # desk-notify
//!
//! In-process real-time notification delivery. The hub keeps one broadcast
//! channel per connected user (the WebSocket endpoint subscribes here);
//! the channel adapter implements the `NotificationChannel` port and
//! resolves role/department membership at dispatch time.

pub mod channel;
pub mod hub;

pub use channel::HubNotificationChannel;
pub use hub::NotificationHub;
