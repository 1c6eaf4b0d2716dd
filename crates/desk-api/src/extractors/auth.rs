//! Authentication extractor
//!
//! Extracts and validates JWT tokens from the Authorization header. The
//! resulting `AuthUser` carries the user id and role claim and converts
//! into the explicit actor threaded through every service call.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use desk_core::workflow::Actor;
use desk_core::UserRole;
use serde::Deserialize;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the token subject
    pub user_id: i64,
    /// Role claim from the token
    pub role: UserRole,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// The explicit actor for service calls
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }

    /// Guard for endpoints restricted to one role
    ///
    /// # Errors
    /// Returns a forbidden error when the role does not match
    pub fn require_role(&self, role: UserRole) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!("Requires the {role} role")))
        }
    }

    /// Guard for endpoints open to any of the given roles
    ///
    /// # Errors
    /// Returns a forbidden error when no role matches
    pub fn require_any_role(&self, roles: &[UserRole]) -> Result<(), ApiError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Insufficient role"))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        // Validate the token
        let claims = app_state
            .jwt_service()
            .validate_access_token(bearer.token())
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid access token");
                ApiError::InvalidAuthFormat
            })?;

        let user_id = claims.user_id().map_err(|e| {
            tracing::warn!(error = %e, "Invalid user ID in token");
            ApiError::InvalidAuthFormat
        })?;

        Ok(AuthUser::new(user_id, claims.role))
    }
}

/// Query parameters for WebSocket authentication.
///
/// Browsers cannot set headers on WebSocket upgrades, so the token rides
/// in the query string as it did for the original real-time hub.
#[derive(Debug, Deserialize)]
pub struct WsAuthQuery {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        let user = AuthUser::new(4, UserRole::TravelAdmin);
        assert!(user.require_role(UserRole::TravelAdmin).is_ok());
        assert!(user.require_role(UserRole::Admin).is_err());
    }

    #[test]
    fn test_require_any_role() {
        let user = AuthUser::new(7, UserRole::Manager);
        assert!(user
            .require_any_role(&[UserRole::Manager, UserRole::Admin])
            .is_ok());
        assert!(user.require_any_role(&[UserRole::Admin]).is_err());
    }

    #[test]
    fn test_actor_carries_id_and_role() {
        let user = AuthUser::new(7, UserRole::Manager);
        let actor = user.actor();
        assert_eq!(actor.id, 7);
        assert_eq!(actor.role, UserRole::Manager);
    }
}
