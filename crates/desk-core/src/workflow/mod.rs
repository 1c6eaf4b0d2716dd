//! Travel request workflow rules
//!
//! The legal-edge table for the status state machine, and the pure
//! authorization check for each edge. The original controllers duplicated
//! these rules per endpoint; here the table is the single authority and the
//! workflow engine consults it before every commit.
//!
//! Edges name the *resolved* manager: the manager recorded on the
//! requester's profile, never the acting user's own id.

use crate::error::DomainError;
use crate::value_objects::{RequestStatus, UserRole};

/// The authenticated principal driving a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub role: UserRole,
}

impl Actor {
    #[must_use]
    pub fn new(id: i64, role: UserRole) -> Self {
        Self { id, role }
    }
}

/// Source-state pattern of a transition edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFrom {
    /// Exactly this status
    Exactly(RequestStatus),
    /// Any status that is not terminal
    AnyNonTerminal,
    /// Either returned state
    Returned,
}

impl EdgeFrom {
    fn matches(&self, from: RequestStatus) -> bool {
        match self {
            Self::Exactly(status) => *status == from,
            Self::AnyNonTerminal => !from.is_terminal(),
            Self::Returned => from.is_returned(),
        }
    }
}

/// Who may drive an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeActor {
    /// The requester's assigned manager
    AssignedManager,
    /// Any travel admin
    TravelAdmin,
    /// A travel admin, or the assigned manager
    TravelAdminOrAssignedManager,
    /// The requester themselves, or the assigned manager (resubmission)
    RequesterOrAssignedManager,
}

/// One row of the legal-transition table
#[derive(Debug, Clone, Copy)]
pub struct TransitionEdge {
    pub from: EdgeFrom,
    pub to: RequestStatus,
    pub actor: EdgeActor,
    pub requires_comments: bool,
}

/// The complete legal-transition table.
///
/// Targets are unique per (from, to) pair; `find_edge` scans in order.
pub const EDGES: [TransitionEdge; 7] = [
    TransitionEdge {
        from: EdgeFrom::Exactly(RequestStatus::Pending),
        to: RequestStatus::Approved,
        actor: EdgeActor::AssignedManager,
        requires_comments: false,
    },
    TransitionEdge {
        from: EdgeFrom::Exactly(RequestStatus::Pending),
        to: RequestStatus::Rejected,
        actor: EdgeActor::AssignedManager,
        requires_comments: false,
    },
    TransitionEdge {
        from: EdgeFrom::Exactly(RequestStatus::Approved),
        to: RequestStatus::Booked,
        actor: EdgeActor::TravelAdmin,
        requires_comments: false,
    },
    TransitionEdge {
        from: EdgeFrom::AnyNonTerminal,
        to: RequestStatus::ReturnedToManager,
        actor: EdgeActor::TravelAdmin,
        requires_comments: true,
    },
    TransitionEdge {
        from: EdgeFrom::AnyNonTerminal,
        to: RequestStatus::ReturnedToEmployee,
        actor: EdgeActor::TravelAdminOrAssignedManager,
        requires_comments: true,
    },
    TransitionEdge {
        from: EdgeFrom::Exactly(RequestStatus::Booked),
        to: RequestStatus::Completed,
        actor: EdgeActor::TravelAdmin,
        requires_comments: false,
    },
    TransitionEdge {
        from: EdgeFrom::Returned,
        to: RequestStatus::Pending,
        actor: EdgeActor::RequesterOrAssignedManager,
        requires_comments: false,
    },
];

/// Look up the edge for a (from, to) pair.
///
/// Returns `None` for pairs outside the table. `from == to` is never an
/// edge: the engine treats it as an idempotent retry before consulting the
/// table.
#[must_use]
pub fn find_edge(from: RequestStatus, to: RequestStatus) -> Option<&'static TransitionEdge> {
    if from == to {
        return None;
    }
    EDGES
        .iter()
        .find(|edge| edge.to == to && edge.from.matches(from))
}

impl TransitionEdge {
    /// Check whether `actor` may drive this edge for a request owned by
    /// `requester_id` whose assigned manager is `manager_id`.
    ///
    /// # Errors
    /// `RoleNotPermitted` when the actor's role cannot drive the edge at
    /// all; `NotAssignedManager` when a manager is acting on a request that
    /// is not their report's.
    pub fn authorize(
        &self,
        actor: &Actor,
        requester_id: i64,
        manager_id: Option<i64>,
    ) -> Result<(), DomainError> {
        let is_assigned_manager =
            actor.role == UserRole::Manager && manager_id == Some(actor.id);

        match self.actor {
            EdgeActor::AssignedManager => {
                if actor.role != UserRole::Manager {
                    return Err(DomainError::RoleNotPermitted {
                        role: actor.role,
                        to: self.to,
                    });
                }
                if !is_assigned_manager {
                    return Err(DomainError::NotAssignedManager { actor_id: actor.id });
                }
                Ok(())
            }
            EdgeActor::TravelAdmin => {
                if actor.role == UserRole::TravelAdmin {
                    Ok(())
                } else {
                    Err(DomainError::RoleNotPermitted {
                        role: actor.role,
                        to: self.to,
                    })
                }
            }
            EdgeActor::TravelAdminOrAssignedManager => {
                if actor.role == UserRole::TravelAdmin || is_assigned_manager {
                    Ok(())
                } else if actor.role == UserRole::Manager {
                    Err(DomainError::NotAssignedManager { actor_id: actor.id })
                } else {
                    Err(DomainError::RoleNotPermitted {
                        role: actor.role,
                        to: self.to,
                    })
                }
            }
            EdgeActor::RequesterOrAssignedManager => {
                if actor.id == requester_id || is_assigned_manager {
                    Ok(())
                } else if actor.role == UserRole::Manager {
                    Err(DomainError::NotAssignedManager { actor_id: actor.id })
                } else {
                    Err(DomainError::RoleNotPermitted {
                        role: actor.role,
                        to: self.to,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGAL: [(RequestStatus, RequestStatus); 14] = [
        (RequestStatus::Pending, RequestStatus::Approved),
        (RequestStatus::Pending, RequestStatus::Rejected),
        (RequestStatus::Approved, RequestStatus::Booked),
        (RequestStatus::Booked, RequestStatus::Completed),
        // ReturnedToManager from any non-terminal source
        (RequestStatus::Pending, RequestStatus::ReturnedToManager),
        (RequestStatus::Approved, RequestStatus::ReturnedToManager),
        (RequestStatus::Booked, RequestStatus::ReturnedToManager),
        (RequestStatus::ReturnedToEmployee, RequestStatus::ReturnedToManager),
        // ReturnedToEmployee from any non-terminal source
        (RequestStatus::Pending, RequestStatus::ReturnedToEmployee),
        (RequestStatus::Approved, RequestStatus::ReturnedToEmployee),
        (RequestStatus::Booked, RequestStatus::ReturnedToEmployee),
        (RequestStatus::ReturnedToManager, RequestStatus::ReturnedToEmployee),
        // Resubmission
        (RequestStatus::ReturnedToManager, RequestStatus::Pending),
        (RequestStatus::ReturnedToEmployee, RequestStatus::Pending),
    ];

    #[test]
    fn test_exact_legal_edge_set() {
        for from in RequestStatus::ALL {
            for to in RequestStatus::ALL {
                let legal = LEGAL.contains(&(from, to));
                assert_eq!(
                    find_edge(from, to).is_some(),
                    legal,
                    "edge {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_edges() {
        for from in [RequestStatus::Rejected, RequestStatus::Completed] {
            for to in RequestStatus::ALL {
                assert!(find_edge(from, to).is_none(), "edge {from} -> {to}");
            }
        }
    }

    #[test]
    fn test_self_edges_are_never_in_the_table() {
        for status in RequestStatus::ALL {
            assert!(find_edge(status, status).is_none());
        }
    }

    #[test]
    fn test_return_edges_require_comments() {
        let edge = find_edge(RequestStatus::Pending, RequestStatus::ReturnedToManager).unwrap();
        assert!(edge.requires_comments);
        let edge = find_edge(RequestStatus::Booked, RequestStatus::ReturnedToEmployee).unwrap();
        assert!(edge.requires_comments);
        let edge = find_edge(RequestStatus::Pending, RequestStatus::Approved).unwrap();
        assert!(!edge.requires_comments);
    }

    #[test]
    fn test_assigned_manager_may_approve() {
        let edge = find_edge(RequestStatus::Pending, RequestStatus::Approved).unwrap();
        let manager = Actor::new(7, UserRole::Manager);
        assert!(edge.authorize(&manager, 3, Some(7)).is_ok());
    }

    #[test]
    fn test_other_manager_may_not_approve() {
        let edge = find_edge(RequestStatus::Pending, RequestStatus::Approved).unwrap();
        let other = Actor::new(9, UserRole::Manager);
        let err = edge.authorize(&other, 3, Some(7)).unwrap_err();
        assert!(matches!(err, DomainError::NotAssignedManager { actor_id: 9 }));
    }

    #[test]
    fn test_non_manager_roles_may_not_approve() {
        let edge = find_edge(RequestStatus::Pending, RequestStatus::Approved).unwrap();
        for role in [UserRole::Employee, UserRole::TravelAdmin, UserRole::Admin] {
            let err = edge.authorize(&Actor::new(7, role), 3, Some(7)).unwrap_err();
            assert!(matches!(err, DomainError::RoleNotPermitted { .. }));
        }
    }

    #[test]
    fn test_only_travel_admin_books() {
        let edge = find_edge(RequestStatus::Approved, RequestStatus::Booked).unwrap();
        assert!(edge
            .authorize(&Actor::new(4, UserRole::TravelAdmin), 3, Some(7))
            .is_ok());
        assert!(edge
            .authorize(&Actor::new(7, UserRole::Manager), 3, Some(7))
            .is_err());
    }

    #[test]
    fn test_return_to_employee_accepts_admin_or_assigned_manager() {
        let edge = find_edge(RequestStatus::Pending, RequestStatus::ReturnedToEmployee).unwrap();
        assert!(edge
            .authorize(&Actor::new(4, UserRole::TravelAdmin), 3, Some(7))
            .is_ok());
        assert!(edge
            .authorize(&Actor::new(7, UserRole::Manager), 3, Some(7))
            .is_ok());
        assert!(edge
            .authorize(&Actor::new(9, UserRole::Manager), 3, Some(7))
            .is_err());
        assert!(edge
            .authorize(&Actor::new(3, UserRole::Employee), 3, Some(7))
            .is_err());
    }

    #[test]
    fn test_resubmission_accepts_requester_or_assigned_manager() {
        let edge = find_edge(RequestStatus::ReturnedToEmployee, RequestStatus::Pending).unwrap();
        // the requester, whatever their role
        assert!(edge
            .authorize(&Actor::new(3, UserRole::Employee), 3, Some(7))
            .is_ok());
        // their manager
        assert!(edge
            .authorize(&Actor::new(7, UserRole::Manager), 3, Some(7))
            .is_ok());
        // anyone else
        assert!(edge
            .authorize(&Actor::new(4, UserRole::TravelAdmin), 3, Some(7))
            .is_err());
    }

    #[test]
    fn test_request_without_manager_cannot_be_approved() {
        let edge = find_edge(RequestStatus::Pending, RequestStatus::Approved).unwrap();
        let err = edge
            .authorize(&Actor::new(7, UserRole::Manager), 3, None)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotAssignedManager { .. }));
    }
}
