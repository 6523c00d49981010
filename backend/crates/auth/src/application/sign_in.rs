//! Sign In Use Case
//!
//! Credential validation and session issuance.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::credential_store::CredentialStore;
use crate::domain::entity::{session::SessionData, user::UserIdentity};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::{SessionId, email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct SignInInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct SignInOutput {
    pub session_id: SessionId,
    pub user: UserIdentity,
}

pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    credentials: CredentialStore<U>,
    session_store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> SignInUseCase<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    pub fn new(
        credentials: CredentialStore<U>,
        session_store: Arc<S>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            credentials,
            session_store,
            config,
        }
    }

    /// Validate credentials, then mint a session.
    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let identity = self
            .validate_user(&input.email, input.password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        self.login(identity).await
    }

    /// `None` for an unknown email, a wrong password or unusable input.
    /// Every path performs exactly one Argon2 verification.
    pub async fn validate_user(
        &self,
        email: &str,
        password: String,
    ) -> AuthResult<Option<UserIdentity>> {
        let (email, password) = match (Email::new(email), RawPassword::new(password)) {
            (Ok(email), Ok(password)) => (email, password),
            (_, password) => {
                self.credentials.verify_decoy(password.ok()).await;
                return Ok(None);
            }
        };

        let Some(user) = self.credentials.find_by_email(&email).await? else {
            self.credentials.verify_decoy(Some(password)).await;
            return Ok(None);
        };

        if !self
            .credentials
            .verify_password(password, &user.password)
            .await
        {
            return Ok(None);
        }

        Ok(Some(user.identity()))
    }

    /// Mint a fresh session for an already-authenticated identity.
    pub async fn login(&self, identity: UserIdentity) -> AuthResult<SignInOutput> {
        let session_id = start_session(self.session_store.as_ref(), &self.config, &identity).await?;

        tracing::info!(user_id = %identity.id, "User signed in");

        Ok(SignInOutput {
            session_id,
            user: identity,
        })
    }
}

/// Store `{userId, email, name}` under a new random id with the default TTL.
pub(crate) async fn start_session<S>(
    store: &S,
    config: &AuthConfig,
    identity: &UserIdentity,
) -> AuthResult<SessionId>
where
    S: SessionStore,
{
    let session_id = SessionId::new();
    store
        .set_session(&session_id, &SessionData::from(identity), config.session_ttl)
        .await?;
    Ok(session_id)
}
