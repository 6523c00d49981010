//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use std::time::Duration;

use crate::domain::entity::{
    session::SessionData,
    user::{NewUser, User},
};
use crate::domain::value_object::{SessionId, email::Email, user_id::UserId};
use crate::error::AuthResult;

/// Credential persistence.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user. A duplicate email fails with `AuthError::EmailTaken`.
    async fn create(&self, user: NewUser) -> AuthResult<User>;

    /// Includes the password hash; verification use only.
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

/// Session persistence with store-enforced expiry.
///
/// Expired sessions are indistinguishable from sessions that never existed.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Write with an absolute TTL, overwriting any existing value.
    async fn set_session(&self, id: &SessionId, data: &SessionData, ttl: Duration)
    -> AuthResult<()>;

    /// `None` for missing or expired ids.
    async fn get_session(&self, id: &SessionId) -> AuthResult<Option<SessionData>>;

    /// Idempotent.
    async fn delete_session(&self, id: &SessionId) -> AuthResult<()>;

    /// Reset the TTL without touching the data. Returns `false` (and creates
    /// nothing) when the session does not exist.
    async fn extend_session(&self, id: &SessionId, ttl: Duration) -> AuthResult<bool>;

    /// Delete every session of `user_id`. Scans all sessions; not atomic.
    async fn delete_all_user_sessions(&self, user_id: UserId) -> AuthResult<u64>;

    /// Ids of every live session of `user_id`. Scans all sessions.
    async fn get_active_sessions(&self, user_id: UserId) -> AuthResult<Vec<SessionId>>;
}
