//! Domain events

mod notification;

pub use notification::{status_title, NotificationEvent, NotificationTarget};
