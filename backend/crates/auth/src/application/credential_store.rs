//! Credential Store
//!
//! Owns user records and the password lifecycle. Plaintext passwords are
//! hashed before they reach the repository and are never logged.
//!
//! Lookups that find no account still pay for one Argon2 verification
//! against a decoy hash, so response time does not reveal whether an email
//! is registered.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, SafeUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_id::UserId,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::AuthResult;

/// Input hashed once per store to build the decoy
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

pub struct CredentialStore<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
    decoy: Arc<OnceCell<UserPassword>>,
}

impl<U> Clone for CredentialStore<U>
where
    U: UserRepository,
{
    fn clone(&self) -> Self {
        Self {
            user_repo: self.user_repo.clone(),
            config: self.config.clone(),
            decoy: self.decoy.clone(),
        }
    }
}

impl<U> CredentialStore<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            config,
            decoy: Arc::new(OnceCell::new()),
        }
    }

    /// Hash the password (blocking pool) and persist the user.
    pub async fn create_user(
        &self,
        email: Email,
        password: RawPassword,
        name: UserName,
    ) -> AuthResult<SafeUser> {
        let password =
            UserPassword::hash(password, self.config.pepper(), self.config.hash_cost).await?;

        let user = self
            .user_repo
            .create(NewUser {
                email,
                name,
                password,
            })
            .await?;

        Ok(user.to_safe())
    }

    pub async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        self.user_repo.exists_by_email(email).await
    }

    /// Full record including the hash.
    pub async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.user_repo.find_by_email(email).await
    }

    pub async fn find_by_id(&self, id: UserId) -> AuthResult<Option<SafeUser>> {
        Ok(self.user_repo.find_by_id(id).await?.map(|u| u.to_safe()))
    }

    /// `false` on mismatch or unreadable hash; never an error.
    pub async fn verify_password(&self, password: RawPassword, hash: &UserPassword) -> bool {
        hash.verify(password, self.config.pepper()).await
    }

    /// Run one verification against the decoy hash and discard the result.
    ///
    /// `None` (unusable input) verifies the decoy input itself.
    pub async fn verify_decoy(&self, password: Option<RawPassword>) {
        let password = match password {
            Some(password) => password,
            None => match RawPassword::new(DECOY_PASSWORD.to_string()) {
                Ok(password) => password,
                Err(_) => return,
            },
        };

        match self.decoy_hash().await {
            Ok(hash) => {
                hash.verify(password, self.config.pepper()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Decoy password hash unavailable");
            }
        }
    }

    /// Built lazily with the configured cost and pepper, then reused.
    async fn decoy_hash(&self) -> AuthResult<&UserPassword> {
        if let Some(hash) = self.decoy.get() {
            return Ok(hash);
        }

        let raw = RawPassword::new(DECOY_PASSWORD.to_string())?;
        let hash = self
            .decoy
            .get_or_try_init(|| UserPassword::hash(raw, self.config.pepper(), self.config.hash_cost))
            .await?;
        Ok(hash)
    }

    #[cfg(test)]
    pub(crate) fn decoy_ready(&self) -> bool {
        self.decoy.initialized()
    }
}
