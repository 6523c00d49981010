//! Sign Out Use Case
//!
//! Invalidates one session or every session of a user.

use std::sync::Arc;

use crate::domain::repository::SessionStore;
use crate::domain::value_object::{SessionId, user_id::UserId};
use crate::error::AuthResult;

pub struct SignOutUseCase<S>
where
    S: SessionStore,
{
    session_store: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(session_store: Arc<S>) -> Self {
        Self { session_store }
    }

    /// Idempotent.
    pub async fn execute(&self, session_id: &SessionId) -> AuthResult<()> {
        self.session_store.delete_session(session_id).await?;

        tracing::info!(session_id = %session_id, "User signed out");
        Ok(())
    }

    /// Best effort: sessions created while the scan runs may survive.
    pub async fn execute_all(&self, user_id: UserId) -> AuthResult<u64> {
        let deleted = self.session_store.delete_all_user_sessions(user_id).await?;

        tracing::info!(
            user_id = %user_id,
            sessions_deleted = deleted,
            "User signed out from all sessions"
        );

        Ok(deleted)
    }
}
