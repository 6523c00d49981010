//! Sign Up Use Case
//!
//! Registers a user and signs them in immediately.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::credential_store::CredentialStore;
use crate::application::sign_in::start_session;
use crate::domain::entity::user::SafeUser;
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::{
    SessionId, email::Email, user_name::UserName, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug)]
pub struct SignUpOutput {
    pub session_id: SessionId,
    pub user: SafeUser,
}

pub struct SignUpUseCase<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    credentials: CredentialStore<U>,
    session_store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> SignUpUseCase<U, S>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let email = Email::new(input.email)?;
        let name = UserName::new(input.name)?;
        let password = RawPassword::new(input.password)?;

        // The unique index still catches concurrent registrations.
        if self.credentials.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let user = self.credentials.create_user(email, password, name).await?;

        let session_id =
            start_session(self.session_store.as_ref(), &self.config, &user.identity()).await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(SignUpOutput { session_id, user })
    }
}
