//! Workflow engine and side-effect dispatcher tests
//!
//! Runs the real services against in-memory fakes: a hashmap-backed
//! request store with version-checked commits, recording audit /
//! notification / mail doubles, and a failure-toggled renderer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use desk_common::auth::JwtService;
use desk_core::entities::{
    AuditAction, AuditEntry, Department, Project, TicketDetails, TravelRequest, User,
};
use desk_core::error::DomainError;
use desk_core::events::{NotificationEvent, NotificationTarget};
use desk_core::traits::{
    AuditRepository, DepartmentRepository, MailSender, NotificationChannel, ProjectRepository,
    RepoResult, TicketRenderer, TravelRequestRepository, UserRepository,
};
use desk_core::value_objects::{RequestStatus, UserRole};
use desk_core::workflow::Actor;
use desk_service::services::{
    ServiceContext, ServiceContextBuilder, ServiceError, TransitionInput, WorkflowService,
};

// ============================================================================
// Fakes
// ============================================================================

#[derive(Default)]
struct InMemoryRequestRepo {
    rows: Mutex<HashMap<i64, TravelRequest>>,
    fail_commit_with_conflict: AtomicBool,
}

impl InMemoryRequestRepo {
    fn insert(&self, request: TravelRequest) {
        self.rows.lock().unwrap().insert(request.id, request);
    }

    fn stored(&self, id: i64) -> TravelRequest {
        self.rows.lock().unwrap().get(&id).cloned().unwrap()
    }
}

#[async_trait]
impl TravelRequestRepository for InMemoryRequestRepo {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<TravelRequest>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|r| r.is_active)
            .cloned())
    }

    async fn find_by_requester(&self, requester_id: i64) -> RepoResult<Vec<TravelRequest>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.requester_id == requester_id)
            .cloned()
            .collect())
    }

    async fn find_by_manager(&self, _manager_id: i64) -> RepoResult<Vec<TravelRequest>> {
        Ok(Vec::new())
    }

    async fn find_by_status(&self, status: RequestStatus) -> RepoResult<Vec<TravelRequest>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> RepoResult<Vec<TravelRequest>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn create(&self, request: &TravelRequest) -> RepoResult<TravelRequest> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.keys().max().copied().unwrap_or(0) + 1;
        let mut created = request.clone();
        created.id = id;
        rows.insert(id, created.clone());
        Ok(created)
    }

    async fn commit(&self, request: &TravelRequest, expected_version: i32) -> RepoResult<()> {
        if self.fail_commit_with_conflict.load(Ordering::SeqCst) {
            return Err(DomainError::StaleRequest(request.id));
        }

        let mut rows = self.rows.lock().unwrap();
        let Some(stored) = rows.get_mut(&request.id).filter(|r| r.is_active) else {
            return Err(DomainError::RequestNotFound(request.id));
        };
        if stored.version != expected_version {
            return Err(DomainError::StaleRequest(request.id));
        }

        *stored = request.clone();
        stored.version = expected_version + 1;
        Ok(())
    }

    async fn deactivate(&self, id: i64) -> RepoResult<()> {
        self.rows.lock().unwrap().get_mut(&id).unwrap().is_active = false;
        Ok(())
    }

    async fn count(
        &self,
        status: Option<RequestStatus>,
        _manager_id: Option<i64>,
    ) -> RepoResult<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .count() as i64)
    }
}

struct FakeUserRepo {
    users: Vec<User>,
}

#[async_trait]
impl UserRepository for FakeUserRepo {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }
    async fn find_by_role(&self, role: UserRole) -> RepoResult<Vec<User>> {
        Ok(self.users.iter().filter(|u| u.role == role).cloned().collect())
    }
    async fn find_by_department(&self, department_id: i64) -> RepoResult<Vec<User>> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.department_id == department_id)
            .cloned()
            .collect())
    }
    async fn find_by_manager(&self, manager_id: i64) -> RepoResult<Vec<User>> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.manager_id == Some(manager_id))
            .cloned()
            .collect())
    }
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        Ok(self.users.clone())
    }
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.users.iter().any(|u| u.email == email))
    }
    async fn create(&self, user: &User, _password_hash: &str) -> RepoResult<User> {
        Ok(user.clone())
    }
    async fn update(&self, _user: &User) -> RepoResult<()> {
        Ok(())
    }
    async fn deactivate(&self, _id: i64) -> RepoResult<()> {
        Ok(())
    }
    async fn get_password_hash(&self, _id: i64) -> RepoResult<Option<String>> {
        Ok(None)
    }
}

#[derive(Default)]
struct RecordingAuditRepo {
    entries: Mutex<Vec<AuditEntry>>,
    fail: AtomicBool,
}

#[async_trait]
impl AuditRepository for RecordingAuditRepo {
    async fn record(&self, entry: &AuditEntry) -> RepoResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("audit store down".to_string()));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
    async fn list(&self, _limit: i64, _offset: i64) -> RepoResult<Vec<AuditEntry>> {
        Ok(self.entries.lock().unwrap().clone())
    }
    async fn count(&self) -> RepoResult<i64> {
        Ok(self.entries.lock().unwrap().len() as i64)
    }
}

struct FakeDepartmentRepo;

#[async_trait]
impl DepartmentRepository for FakeDepartmentRepo {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Department>> {
        let mut department = Department::new("Engineering".to_string(), 1);
        department.id = id;
        Ok(Some(department))
    }
    async fn find_all(&self) -> RepoResult<Vec<Department>> {
        Ok(Vec::new())
    }
    async fn create(&self, department: &Department) -> RepoResult<Department> {
        Ok(department.clone())
    }
    async fn update(&self, _department: &Department) -> RepoResult<()> {
        Ok(())
    }
    async fn deactivate(&self, _id: i64) -> RepoResult<()> {
        Ok(())
    }
}

struct FakeProjectRepo;

#[async_trait]
impl ProjectRepository for FakeProjectRepo {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Project>> {
        let mut project = Project::new("Apollo".to_string(), 1);
        project.id = id;
        Ok(Some(project))
    }
    async fn find_all(&self) -> RepoResult<Vec<Project>> {
        Ok(Vec::new())
    }
    async fn create(&self, project: &Project) -> RepoResult<Project> {
        Ok(project.clone())
    }
    async fn update(&self, _project: &Project) -> RepoResult<()> {
        Ok(())
    }
    async fn deactivate(&self, _id: i64) -> RepoResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct RecordingChannel {
    events: Mutex<Vec<NotificationEvent>>,
    fail: AtomicBool,
}

impl RecordingChannel {
    fn to_user(&self, user_id: i64) -> Vec<NotificationEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.target == NotificationTarget::User { user_id })
            .cloned()
            .collect()
    }

    fn to_role(&self, role: UserRole) -> Vec<NotificationEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.target == NotificationTarget::Role { role })
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn send_to_user(&self, _user_id: i64, event: NotificationEvent) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::NotificationError("hub down".to_string()));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
    async fn send_to_role(&self, _role: UserRole, event: NotificationEvent) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::NotificationError("hub down".to_string()));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
    async fn send_to_department(
        &self,
        _department_id: i64,
        event: NotificationEvent,
    ) -> Result<(), DomainError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

#[derive(Default)]
struct StubRenderer {
    fail: AtomicBool,
}

#[async_trait]
impl TicketRenderer for StubRenderer {
    async fn render_ticket(&self, _details: &TicketDetails) -> Result<Vec<u8>, DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::RenderError("font missing".to_string()));
        }
        Ok(b"%PDF-1.4 fake".to_vec())
    }
}

#[derive(Debug, Clone)]
struct SentMail {
    to: String,
    subject: String,
    has_attachment: bool,
}

#[derive(Default)]
struct RecordingMailSender {
    sent: Mutex<Vec<SentMail>>,
    fail: AtomicBool,
}

#[async_trait]
impl MailSender for RecordingMailSender {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            has_attachment: false,
        });
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::MailError("smtp down".to_string()));
        }
        Ok(())
    }
    async fn send_with_attachment(
        &self,
        to: &str,
        subject: &str,
        _html_body: &str,
        _attachment: Vec<u8>,
        _filename: &str,
    ) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            has_attachment: true,
        });
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::MailError("smtp down".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

const EMPLOYEE: i64 = 3;
const MANAGER: i64 = 7;
const OTHER_MANAGER: i64 = 9;
const TRAVEL_ADMIN: i64 = 4;
const REQUEST: i64 = 42;

struct Harness {
    ctx: ServiceContext,
    requests: Arc<InMemoryRequestRepo>,
    audits: Arc<RecordingAuditRepo>,
    notifications: Arc<RecordingChannel>,
    mails: Arc<RecordingMailSender>,
    renderer: Arc<StubRenderer>,
}

fn seeded_user(id: i64, role: UserRole, manager_id: Option<i64>) -> User {
    let mut user = User::new(
        format!("First{id}"),
        format!("Last{id}"),
        format!("user{id}@corp.example"),
        role,
        2,
        manager_id,
    );
    user.id = id;
    user
}

fn seeded_request(status: RequestStatus) -> TravelRequest {
    let mut request = TravelRequest::new(
        EMPLOYEE,
        1,
        2,
        "Client onboarding".to_string(),
        Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 3, 12, 0, 0, 0).unwrap(),
        "Pune".to_string(),
        "Berlin".to_string(),
    )
    .unwrap();
    request.id = REQUEST;
    request.status = status;
    request
}

fn harness(initial_status: RequestStatus) -> Harness {
    let requests = Arc::new(InMemoryRequestRepo::default());
    requests.insert(seeded_request(initial_status));

    let audits = Arc::new(RecordingAuditRepo::default());
    let notifications = Arc::new(RecordingChannel::default());
    let mails = Arc::new(RecordingMailSender::default());
    let renderer = Arc::new(StubRenderer::default());

    let users = Arc::new(FakeUserRepo {
        users: vec![
            seeded_user(EMPLOYEE, UserRole::Employee, Some(MANAGER)),
            seeded_user(MANAGER, UserRole::Manager, None),
            seeded_user(OTHER_MANAGER, UserRole::Manager, None),
            seeded_user(TRAVEL_ADMIN, UserRole::TravelAdmin, None),
        ],
    });

    let ctx = ServiceContextBuilder::new()
        .travel_request_repo(requests.clone())
        .user_repo(users)
        .audit_repo(audits.clone())
        .department_repo(Arc::new(FakeDepartmentRepo))
        .project_repo(Arc::new(FakeProjectRepo))
        .notification_channel(notifications.clone())
        .ticket_renderer(renderer.clone())
        .mail_sender(mails.clone())
        .jwt_service(Arc::new(JwtService::new("test-secret-key", 900, 604800)))
        .public_base_url("http://localhost:8080")
        .build()
        .unwrap();

    Harness {
        ctx,
        requests,
        audits,
        notifications,
        mails,
        renderer,
    }
}

fn manager() -> Actor {
    Actor::new(MANAGER, UserRole::Manager)
}

fn travel_admin() -> Actor {
    Actor::new(TRAVEL_ADMIN, UserRole::TravelAdmin)
}

// ============================================================================
// Scenarios from the workflow contract
// ============================================================================

#[tokio::test]
async fn approve_by_assigned_manager() {
    let h = harness(RequestStatus::Pending);
    let service = WorkflowService::new(&h.ctx);

    let updated = service
        .transition(
            REQUEST,
            RequestStatus::Approved,
            manager(),
            TransitionInput::with_comments("ok"),
        )
        .await
        .unwrap();

    assert_eq!(updated.status, RequestStatus::Approved);
    assert_eq!(updated.comments.as_deref(), Some("ok"));
    assert!(updated.modified_on.is_some());
    assert_eq!(updated.version, 1);

    let stored = h.requests.stored(REQUEST);
    assert_eq!(stored.status, RequestStatus::Approved);

    // exactly one audit entry for the mutation
    let entries = h.audits.entries.lock().unwrap().clone();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entity_id, REQUEST);
    assert_eq!(entries[0].entity_name, "TravelRequest");
    assert_eq!(entries[0].action, AuditAction::EntityModified);
    assert_eq!(entries[0].acting_user_id, MANAGER);
    let diff = entries[0].changes.as_ref().unwrap().to_string();
    assert!(diff.contains("status"));

    // requester notified, travel admins notified
    assert_eq!(h.notifications.to_user(EMPLOYEE).len(), 1);
    let to_admins = h.notifications.to_role(UserRole::TravelAdmin);
    assert_eq!(to_admins.len(), 1);
    assert_eq!(to_admins[0].title, "New Request for Booking");
}

#[tokio::test]
async fn approve_by_other_manager_is_forbidden() {
    let h = harness(RequestStatus::Pending);
    let service = WorkflowService::new(&h.ctx);

    let err = service
        .transition(
            REQUEST,
            RequestStatus::Approved,
            Actor::new(OTHER_MANAGER, UserRole::Manager),
            TransitionInput::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::NotAssignedManager { actor_id: OTHER_MANAGER })
    ));
    assert_eq!(h.requests.stored(REQUEST).status, RequestStatus::Pending);
    assert_eq!(h.audits.entries.lock().unwrap().len(), 0);
    assert_eq!(h.notifications.len(), 0);
}

#[tokio::test]
async fn every_pair_outside_the_table_is_rejected() {
    for from in RequestStatus::ALL {
        for to in RequestStatus::ALL {
            if from == to || desk_core::workflow::find_edge(from, to).is_some() {
                continue;
            }

            let h = harness(from);
            let service = WorkflowService::new(&h.ctx);
            let err = service
                .transition(REQUEST, to, travel_admin(), TransitionInput::default())
                .await
                .unwrap_err();

            assert!(
                matches!(err, ServiceError::Domain(DomainError::InvalidTransition { .. })),
                "expected InvalidTransition for {from} -> {to}"
            );
            assert_eq!(h.requests.stored(REQUEST).status, from);
            assert_eq!(h.audits.entries.lock().unwrap().len(), 0);
        }
    }
}

#[tokio::test]
async fn terminal_states_reject_everything() {
    let h = harness(RequestStatus::Completed);
    let service = WorkflowService::new(&h.ctx);

    let err = service
        .transition(
            REQUEST,
            RequestStatus::Booked,
            travel_admin(),
            TransitionInput::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InvalidTransition { .. })
    ));
    assert_eq!(h.requests.stored(REQUEST).status, RequestStatus::Completed);
}

#[tokio::test]
async fn reapplying_current_status_is_a_no_op() {
    let h = harness(RequestStatus::Approved);
    let service = WorkflowService::new(&h.ctx);

    let result = service
        .transition(
            REQUEST,
            RequestStatus::Approved,
            manager(),
            TransitionInput::with_comments("retry"),
        )
        .await
        .unwrap();

    assert_eq!(result.status, RequestStatus::Approved);
    assert_eq!(result.version, 0, "no commit happened");
    assert!(result.comments.is_none(), "retry must not mutate the entity");
    assert_eq!(h.audits.entries.lock().unwrap().len(), 0);
    assert_eq!(h.notifications.len(), 0);
}

#[tokio::test]
async fn unknown_request_is_not_found() {
    let h = harness(RequestStatus::Pending);
    let service = WorkflowService::new(&h.ctx);

    let err = service
        .transition(999, RequestStatus::Approved, manager(), TransitionInput::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::RequestNotFound(999))
    ));
}

#[tokio::test]
async fn return_edges_require_comments() {
    let h = harness(RequestStatus::Approved);
    let service = WorkflowService::new(&h.ctx);

    let err = service
        .transition(
            REQUEST,
            RequestStatus::ReturnedToManager,
            travel_admin(),
            TransitionInput::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::MissingComments)
    ));
    assert_eq!(h.requests.stored(REQUEST).status, RequestStatus::Approved);

    // blank comments are missing comments
    let err = service
        .transition(
            REQUEST,
            RequestStatus::ReturnedToManager,
            travel_admin(),
            TransitionInput::with_comments("   "),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::MissingComments)
    ));

    let updated = service
        .transition(
            REQUEST,
            RequestStatus::ReturnedToManager,
            travel_admin(),
            TransitionInput::with_comments("fare class not allowed"),
        )
        .await
        .unwrap();
    assert_eq!(updated.status, RequestStatus::ReturnedToManager);
    assert_eq!(updated.comments.as_deref(), Some("fare class not allowed"));
}

#[tokio::test]
async fn booking_sends_mail_with_attachment() {
    let h = harness(RequestStatus::Approved);
    let service = WorkflowService::new(&h.ctx);

    let updated = service
        .transition(
            REQUEST,
            RequestStatus::Booked,
            travel_admin(),
            TransitionInput {
                comments: None,
                ticket_url: Some("https://tickets.example/42".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, RequestStatus::Booked);
    assert_eq!(updated.ticket_url.as_deref(), Some("https://tickets.example/42"));

    let sent = h.mails.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1, "exactly one mail per booking");
    assert_eq!(sent[0].to, format!("user{EMPLOYEE}@corp.example"));
    assert_eq!(sent[0].subject, "Your Ticket has been Booked!");
    assert!(sent[0].has_attachment);

    // requester still gets the status notification
    assert_eq!(h.notifications.to_user(EMPLOYEE).len(), 1);
}

#[tokio::test]
async fn booking_without_ticket_url_records_download_path() {
    let h = harness(RequestStatus::Approved);
    let service = WorkflowService::new(&h.ctx);

    let updated = service
        .transition(
            REQUEST,
            RequestStatus::Booked,
            travel_admin(),
            TransitionInput::default(),
        )
        .await
        .unwrap();

    assert_eq!(
        updated.ticket_url.as_deref(),
        Some("http://localhost:8080/api/v1/travel-requests/42/ticket")
    );
}

#[tokio::test]
async fn render_failure_degrades_to_mail_without_attachment() {
    let h = harness(RequestStatus::Approved);
    h.renderer.fail.store(true, Ordering::SeqCst);
    let service = WorkflowService::new(&h.ctx);

    let updated = service
        .transition(
            REQUEST,
            RequestStatus::Booked,
            travel_admin(),
            TransitionInput::default(),
        )
        .await
        .unwrap();

    assert_eq!(updated.status, RequestStatus::Booked, "booking still succeeds");

    let sent = h.mails.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert!(!sent[0].has_attachment);
    assert_eq!(sent[0].subject, "Your Ticket has been Booked!");
}

#[tokio::test]
async fn mail_failure_never_reverts_the_booking() {
    let h = harness(RequestStatus::Approved);
    h.mails.fail.store(true, Ordering::SeqCst);
    let service = WorkflowService::new(&h.ctx);

    let updated = service
        .transition(
            REQUEST,
            RequestStatus::Booked,
            travel_admin(),
            TransitionInput::default(),
        )
        .await
        .unwrap();

    assert_eq!(updated.status, RequestStatus::Booked);
    assert_eq!(h.requests.stored(REQUEST).status, RequestStatus::Booked);
    // one attempt, not retried
    assert_eq!(h.mails.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn audit_failure_does_not_block_notification() {
    let h = harness(RequestStatus::Pending);
    h.audits.fail.store(true, Ordering::SeqCst);
    let service = WorkflowService::new(&h.ctx);

    let updated = service
        .transition(
            REQUEST,
            RequestStatus::Approved,
            manager(),
            TransitionInput::default(),
        )
        .await
        .unwrap();

    assert_eq!(updated.status, RequestStatus::Approved);
    // notification step still ran
    assert_eq!(h.notifications.to_user(EMPLOYEE).len(), 1);
}

#[tokio::test]
async fn notification_failure_is_contained() {
    let h = harness(RequestStatus::Pending);
    h.notifications.fail.store(true, Ordering::SeqCst);
    let service = WorkflowService::new(&h.ctx);

    let updated = service
        .transition(
            REQUEST,
            RequestStatus::Rejected,
            manager(),
            TransitionInput::with_comments("budget"),
        )
        .await
        .unwrap();

    assert_eq!(updated.status, RequestStatus::Rejected);
    assert_eq!(h.audits.entries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn rejected_notifies_requester_only() {
    let h = harness(RequestStatus::Pending);
    let service = WorkflowService::new(&h.ctx);

    service
        .transition(
            REQUEST,
            RequestStatus::Rejected,
            manager(),
            TransitionInput::with_comments("budget"),
        )
        .await
        .unwrap();

    assert_eq!(h.notifications.to_user(EMPLOYEE).len(), 1);
    assert!(h.notifications.to_role(UserRole::TravelAdmin).is_empty());
    let event = &h.notifications.to_user(EMPLOYEE)[0];
    assert_eq!(event.title, "Travel Request Rejected");
}

#[tokio::test]
async fn concurrent_commit_surfaces_conflict() {
    let h = harness(RequestStatus::Pending);
    h.requests.fail_commit_with_conflict.store(true, Ordering::SeqCst);
    let service = WorkflowService::new(&h.ctx);

    let err = service
        .transition(
            REQUEST,
            RequestStatus::Approved,
            manager(),
            TransitionInput::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::StaleRequest(REQUEST))
    ));
    // losing writer leaves no side effects behind
    assert_eq!(h.audits.entries.lock().unwrap().len(), 0);
    assert_eq!(h.notifications.len(), 0);
}

#[tokio::test]
async fn stale_version_detected_by_store() {
    let h = harness(RequestStatus::Pending);

    // another writer advanced the row after our read
    let mut concurrent = h.requests.stored(REQUEST);
    concurrent.apply_transition(RequestStatus::Approved, None, None);
    h.requests.commit(&concurrent, 0).await.unwrap();

    let err = h.requests.commit(&concurrent, 0).await.unwrap_err();
    assert!(matches!(err, DomainError::StaleRequest(REQUEST)));
}

#[tokio::test]
async fn resubmission_by_requester() {
    let h = harness(RequestStatus::ReturnedToEmployee);
    let service = WorkflowService::new(&h.ctx);

    let updated = service
        .transition(
            REQUEST,
            RequestStatus::Pending,
            Actor::new(EMPLOYEE, UserRole::Employee),
            TransitionInput::default(),
        )
        .await
        .unwrap();

    assert_eq!(updated.status, RequestStatus::Pending);
    assert_eq!(h.audits.entries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn resubmission_by_stranger_is_forbidden() {
    let h = harness(RequestStatus::ReturnedToEmployee);
    let service = WorkflowService::new(&h.ctx);

    let err = service
        .transition(
            REQUEST,
            RequestStatus::Pending,
            travel_admin(),
            TransitionInput::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::RoleNotPermitted { .. })
    ));
}

#[tokio::test]
async fn full_lifecycle_to_completed() {
    let h = harness(RequestStatus::Pending);
    let service = WorkflowService::new(&h.ctx);

    service
        .transition(REQUEST, RequestStatus::Approved, manager(), TransitionInput::with_comments("ok"))
        .await
        .unwrap();
    service
        .transition(REQUEST, RequestStatus::Booked, travel_admin(), TransitionInput::default())
        .await
        .unwrap();
    let done = service
        .transition(REQUEST, RequestStatus::Completed, travel_admin(), TransitionInput::default())
        .await
        .unwrap();

    assert_eq!(done.status, RequestStatus::Completed);
    assert_eq!(done.version, 3);
    // one audit entry per committed transition
    assert_eq!(h.audits.entries.lock().unwrap().len(), 3);
    // one mail, from the booking step only
    assert_eq!(h.mails.sent.lock().unwrap().len(), 1);
}
