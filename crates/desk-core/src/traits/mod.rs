//! Ports - repository traits and collaborator contracts

mod collaborators;
mod repositories;

pub use collaborators::{MailSender, NotificationChannel, TicketRenderer};
pub use repositories::{
    AuditRepository, DepartmentRepository, ProjectRepository, RepoResult,
    TravelRequestRepository, UserRepository,
};
