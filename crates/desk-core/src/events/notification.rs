//! Notification events - transient messages pushed to connected clients
//!
//! Events are not persisted by the workflow core; delivery is best effort
//! and a failed dispatch never affects the committed transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{RequestStatus, UserRole};

/// Delivery target of a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum NotificationTarget {
    User { user_id: i64 },
    Role { role: UserRole },
    Department { department_id: i64 },
}

/// A single notification to be delivered over the real-time channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub id: u32,
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(flatten)]
    pub target: NotificationTarget,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl NotificationEvent {
    pub fn new(
        kind: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        target: NotificationTarget,
    ) -> Self {
        Self {
            id: 0,
            kind: kind.into(),
            title: title.into(),
            message: message.into(),
            target,
            timestamp: Utc::now(),
            data: None,
            action_url: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }
}

/// Notification title for a transition into `status`.
///
/// The lookup table the dispatcher uses for the requester-facing message.
#[must_use]
pub fn status_title(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Approved => "Travel Request Approved",
        RequestStatus::Rejected => "Travel Request Rejected",
        RequestStatus::Booked => "Travel Booking Confirmed",
        RequestStatus::Completed => "Travel Request Completed",
        _ => "Travel Request Updated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_titles() {
        assert_eq!(status_title(RequestStatus::Approved), "Travel Request Approved");
        assert_eq!(status_title(RequestStatus::Booked), "Travel Booking Confirmed");
        assert_eq!(
            status_title(RequestStatus::ReturnedToEmployee),
            "Travel Request Updated"
        );
    }

    #[test]
    fn test_event_serialization() {
        let event = NotificationEvent::new(
            "travel_request",
            "Travel Request Approved",
            "Your travel request #42 has been approved",
            NotificationTarget::User { user_id: 3 },
        )
        .with_action_url("/employee/requests/42");

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"target\":\"user\""));
        assert!(json.contains("\"user_id\":3"));
        assert!(json.contains("action_url"));

        let parsed: NotificationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.target, NotificationTarget::User { user_id: 3 });
    }

    #[test]
    fn test_role_target_serialization() {
        let event = NotificationEvent::new(
            "travel_request",
            "New Request for Booking",
            "Travel request #42 needs booking",
            NotificationTarget::Role {
                role: UserRole::TravelAdmin,
            },
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"target\":\"role\""));
    }
}
