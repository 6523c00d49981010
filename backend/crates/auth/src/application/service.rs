//! Authentication Service
//!
//! Single entry point over the use cases, shared by handlers and the
//! session guard. Cheap to clone.

use std::sync::Arc;

use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::application::credential_store::CredentialStore;
use crate::application::sign_in::{SignInInput, SignInOutput, SignInUseCase};
use crate::application::sign_out::SignOutUseCase;
use crate::application::sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
use crate::domain::entity::user::{SafeUser, UserIdentity};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::{SessionId, user_id::UserId};
use crate::error::{AuthError, AuthResult};

pub struct AuthService<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    credentials: CredentialStore<U>,
    session_store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> Clone for AuthService<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    fn clone(&self) -> Self {
        Self {
            credentials: self.credentials.clone(),
            session_store: self.session_store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<U, S> AuthService<U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    pub fn new(user_repo: Arc<U>, session_store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            credentials: CredentialStore::new(user_repo, config.clone()),
            session_store,
            config,
        }
    }

    pub fn config(&self) -> &Arc<AuthConfig> {
        &self.config
    }

    pub fn session_store(&self) -> &Arc<S> {
        &self.session_store
    }

    #[cfg(test)]
    pub(crate) fn credentials(&self) -> &CredentialStore<U> {
        &self.credentials
    }

    fn sign_in(&self) -> SignInUseCase<U, S> {
        SignInUseCase::new(
            self.credentials.clone(),
            self.session_store.clone(),
            self.config.clone(),
        )
    }

    fn check_session(&self) -> CheckSessionUseCase<S> {
        CheckSessionUseCase::new(self.session_store.clone(), self.config.clone())
    }

    /// Create the user and mint their first session.
    pub async fn register(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        SignUpUseCase::new(
            self.credentials.clone(),
            self.session_store.clone(),
            self.config.clone(),
        )
        .execute(input)
        .await
    }

    pub async fn validate_user(
        &self,
        email: &str,
        password: String,
    ) -> AuthResult<Option<UserIdentity>> {
        self.sign_in().validate_user(email, password).await
    }

    pub async fn login(&self, identity: UserIdentity) -> AuthResult<SignInOutput> {
        self.sign_in().login(identity).await
    }

    /// `validate_user` then `login`; `InvalidCredentials` on failure.
    pub async fn authenticate(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        self.sign_in().execute(input).await
    }

    pub async fn logout(&self, session_id: &SessionId) -> AuthResult<()> {
        SignOutUseCase::new(self.session_store.clone())
            .execute(session_id)
            .await
    }

    pub async fn logout_all_sessions(&self, user_id: UserId) -> AuthResult<u64> {
        SignOutUseCase::new(self.session_store.clone())
            .execute_all(user_id)
            .await
    }

    pub async fn validate_session(&self, token: &str) -> AuthResult<Option<UserIdentity>> {
        Ok(self
            .check_session()
            .execute(token)
            .await?
            .map(|session| session.user))
    }

    pub async fn extend_session(&self, session_id: &SessionId) -> AuthResult<bool> {
        self.check_session().extend(session_id).await
    }

    pub async fn active_sessions(&self, user_id: UserId) -> AuthResult<Vec<SessionId>> {
        self.check_session().active_sessions(user_id).await
    }

    pub async fn current_user(&self, user_id: UserId) -> AuthResult<SafeUser> {
        self.credentials
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
