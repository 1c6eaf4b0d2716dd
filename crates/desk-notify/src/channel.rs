//! Notification channel adapter
//!
//! Implements the `NotificationChannel` port on top of the hub. Role and
//! department targets are resolved through the user repository at dispatch
//! time so membership changes take effect immediately.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, info};

use desk_core::error::DomainError;
use desk_core::events::NotificationEvent;
use desk_core::traits::{NotificationChannel, UserRepository};
use desk_core::value_objects::UserRole;

use crate::hub::NotificationHub;

/// Hub-backed notification channel
pub struct HubNotificationChannel {
    hub: Arc<NotificationHub>,
    users: Arc<dyn UserRepository>,
}

impl HubNotificationChannel {
    /// Create a new channel over a hub and a user repository
    pub fn new(hub: Arc<NotificationHub>, users: Arc<dyn UserRepository>) -> Self {
        Self { hub, users }
    }

    fn stamp(mut event: NotificationEvent) -> NotificationEvent {
        event.id = rand::thread_rng().gen_range(1000..10000);
        event
    }
}

#[async_trait]
impl NotificationChannel for HubNotificationChannel {
    async fn send_to_user(
        &self,
        user_id: i64,
        event: NotificationEvent,
    ) -> Result<(), DomainError> {
        let event = Self::stamp(event);
        let title = event.title.clone();
        let delivered = self.hub.publish_to_user(user_id, event);

        info!(user_id, %title, delivered, "Notification sent to user");
        Ok(())
    }

    async fn send_to_role(
        &self,
        role: UserRole,
        event: NotificationEvent,
    ) -> Result<(), DomainError> {
        let members = self.users.find_by_role(role).await?;
        debug!(%role, members = members.len(), "Resolved role members for notification");

        let event = Self::stamp(event);
        for member in &members {
            self.hub.publish_to_user(member.id, event.clone());
        }

        info!(%role, %event.title, "Notification sent to role");
        Ok(())
    }

    async fn send_to_department(
        &self,
        department_id: i64,
        event: NotificationEvent,
    ) -> Result<(), DomainError> {
        let members = self.users.find_by_department(department_id).await?;

        let event = Self::stamp(event);
        for member in &members {
            self.hub.publish_to_user(member.id, event.clone());
        }

        info!(department_id, %event.title, "Notification sent to department");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_core::entities::User;
    use desk_core::events::NotificationTarget;
    use desk_core::traits::RepoResult;

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
        async fn email_exists(&self, _email: &str) -> RepoResult<bool> {
            Ok(false)
        }
        async fn create(&self, _user: &User, _password_hash: &str) -> RepoResult<User> {
            unimplemented!()
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

    fn user(id: i64, role: UserRole) -> User {
        let mut user = User::new(
            format!("user{id}"),
            "test".to_string(),
            format!("user{id}@corp.example"),
            role,
            1,
            None,
        );
        user.id = id;
        user
    }

    fn event() -> NotificationEvent {
        NotificationEvent::new(
            "travel_request",
            "New Request for Booking",
            "Travel request #42 needs booking",
            NotificationTarget::Role {
                role: UserRole::TravelAdmin,
            },
        )
    }

    #[tokio::test]
    async fn test_send_to_role_fans_out_to_members() {
        let hub = NotificationHub::new_shared();
        let mut rx1 = hub.subscribe(10);
        let mut rx2 = hub.subscribe(11);
        let _quiet = hub.subscribe(12); // manager, must not receive

        let users = Arc::new(FakeUserRepo {
            users: vec![
                user(10, UserRole::TravelAdmin),
                user(11, UserRole::TravelAdmin),
                user(12, UserRole::Manager),
            ],
        });
        let channel = HubNotificationChannel::new(hub, users);

        channel
            .send_to_role(UserRole::TravelAdmin, event())
            .await
            .unwrap();

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_send_to_user_stamps_id() {
        let hub = NotificationHub::new_shared();
        let mut rx = hub.subscribe(3);

        let users = Arc::new(FakeUserRepo { users: vec![] });
        let channel = HubNotificationChannel::new(hub, users);

        channel.send_to_user(3, event()).await.unwrap();
        let received = rx.try_recv().unwrap();
        assert!((1000..10000).contains(&received.id));
    }

    #[tokio::test]
    async fn test_send_to_department_resolves_members() {
        let hub = NotificationHub::new_shared();
        let mut rx = hub.subscribe(10);

        let users = Arc::new(FakeUserRepo {
            users: vec![user(10, UserRole::Employee)],
        });
        let channel = HubNotificationChannel::new(hub, users);

        channel.send_to_department(1, event()).await.unwrap();
        assert!(rx.try_recv().is_ok());
    }
}
