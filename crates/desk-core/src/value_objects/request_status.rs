//! Travel request status - the closed set of workflow states
//!
//! The original data model stored free-form status strings with
//! inconsistent casing ("Returned to Manager", "ReturnToEmployee", ...).
//! Here the lifecycle is a closed enumeration; the string forms are only
//! used at the persistence and API boundaries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Workflow state of a travel request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    ReturnedToManager,
    ReturnedToEmployee,
    Booked,
    Completed,
}

impl RequestStatus {
    /// All states, in declaration order
    pub const ALL: [RequestStatus; 7] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::ReturnedToManager,
        Self::ReturnedToEmployee,
        Self::Booked,
        Self::Completed,
    ];

    /// Canonical string form (stored in the database)
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::ReturnedToManager => "ReturnedToManager",
            Self::ReturnedToEmployee => "ReturnedToEmployee",
            Self::Booked => "Booked",
            Self::Completed => "Completed",
        }
    }

    /// Terminal states have no outgoing transitions
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }

    /// Either of the "returned for rework" states
    #[must_use]
    pub fn is_returned(&self) -> bool {
        matches!(self, Self::ReturnedToManager | Self::ReturnedToEmployee)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    /// Parse a stored status string. Accepts the canonical form plus the
    /// legacy spaced variants found in old rows ("Returned to Manager").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            "ReturnedToManager" | "Returned to Manager" => Ok(Self::ReturnedToManager),
            "ReturnedToEmployee" | "Returned to Employee" => Ok(Self::ReturnedToEmployee),
            "Booked" => Ok(Self::Booked),
            "Completed" => Ok(Self::Completed),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for status in RequestStatus::ALL {
            let parsed: RequestStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_legacy_spaced_forms() {
        assert_eq!(
            "Returned to Manager".parse::<RequestStatus>().unwrap(),
            RequestStatus::ReturnedToManager
        );
        assert_eq!(
            "Returned to Employee".parse::<RequestStatus>().unwrap(),
            RequestStatus::ReturnedToEmployee
        );
    }

    #[test]
    fn test_unknown_status() {
        let err = "Cancelled".parse::<RequestStatus>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownStatus(_)));
    }

    #[test]
    fn test_terminal_states() {
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Completed.is_terminal());
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Booked.is_terminal());
    }

    #[test]
    fn test_returned_states() {
        assert!(RequestStatus::ReturnedToManager.is_returned());
        assert!(RequestStatus::ReturnedToEmployee.is_returned());
        assert!(!RequestStatus::Approved.is_returned());
    }
}
