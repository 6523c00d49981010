//! Check Session Use Case
//!
//! Resolves a presented session token to an identity. Never extends the
//! TTL; extension is a separate, explicit operation.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::UserIdentity;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::{SessionId, user_id::UserId};
use crate::error::AuthResult;

/// A presented token that resolved to a live session.
#[derive(Debug, Clone)]
pub struct ValidatedSession {
    pub session_id: SessionId,
    pub user: UserIdentity,
}

pub struct CheckSessionUseCase<S>
where
    S: SessionStore,
{
    session_store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionStore,
{
    pub fn new(session_store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_store,
            config,
        }
    }

    /// `Ok(None)` for malformed, unknown or expired tokens. Errors only
    /// when the store itself fails.
    pub async fn execute(&self, token: &str) -> AuthResult<Option<ValidatedSession>> {
        let Ok(session_id) = token.parse::<SessionId>() else {
            return Ok(None);
        };

        Ok(self
            .session_store
            .get_session(&session_id)
            .await?
            .map(|data| ValidatedSession {
                session_id,
                user: data.into_identity(),
            }))
    }

    /// Reset the TTL to the configured lifetime. `false` if the session is
    /// already gone.
    pub async fn extend(&self, session_id: &SessionId) -> AuthResult<bool> {
        let extended = self
            .session_store
            .extend_session(session_id, self.config.session_ttl)
            .await?;

        if extended {
            tracing::debug!(session_id = %session_id, "Session extended");
        }
        Ok(extended)
    }

    pub async fn active_sessions(&self, user_id: UserId) -> AuthResult<Vec<SessionId>> {
        self.session_store.get_active_sessions(user_id).await
    }
}
