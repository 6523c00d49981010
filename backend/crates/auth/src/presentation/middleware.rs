//! Session Guard Middleware
//!
//! Compose onto protected routers with
//! `route_layer(from_fn_with_state(guard, require_session::<S>))`.
//!
//! On success the request carries [`CurrentUser`] and [`CurrentSession`]
//! extensions for the rest of its life. On any failure it is rejected with
//! the same 401 body. The guard never extends the session TTL.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::application::check_session::{CheckSessionUseCase, ValidatedSession};
use crate::application::config::AuthConfig;
use crate::application::service::AuthService;
use crate::domain::entity::user::UserIdentity;
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::SessionId;
use crate::error::{AuthError, AuthResult, UnauthorizedReason};
use crate::presentation::token::extract_session_token;

/// Middleware state: only the session store is needed to authorize.
pub struct SessionGuard<S>
where
    S: SessionStore,
{
    session_store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> Clone for SessionGuard<S>
where
    S: SessionStore,
{
    fn clone(&self) -> Self {
        Self {
            session_store: self.session_store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<U, S> From<&AuthService<U, S>> for SessionGuard<S>
where
    U: UserRepository,
    S: SessionStore,
{
    fn from(service: &AuthService<U, S>) -> Self {
        Self::new(service.session_store().clone(), service.config().clone())
    }
}

impl<S> SessionGuard<S>
where
    S: SessionStore,
{
    pub fn new(session_store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_store,
            config,
        }
    }

    /// Pull the session token out of the request headers.
    pub fn extract_token(&self, headers: &HeaderMap) -> AuthResult<String> {
        extract_session_token(headers, &self.config.session_header, &self.config.auth_scheme)
            .ok_or(AuthError::Unauthorized(UnauthorizedReason::MissingToken))
    }

    /// Resolve a token to a live session.
    ///
    /// Every failure, including a store outage, becomes
    /// `AuthError::Unauthorized`.
    pub async fn validate(&self, token: &str) -> AuthResult<ValidatedSession> {
        let check = CheckSessionUseCase::new(self.session_store.clone(), self.config.clone());
        match check.execute(token).await {
            Ok(Some(session)) => Ok(session),
            Ok(None) => Err(AuthError::Unauthorized(UnauthorizedReason::InvalidSession)),
            Err(e) => {
                tracing::error!(error = %e, "Session validation failed");
                Err(AuthError::Unauthorized(UnauthorizedReason::ValidationFailed))
            }
        }
    }
}

/// Identity of the caller, set by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserIdentity);

/// Session the caller authenticated with, set by [`require_session`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession(pub SessionId);

pub async fn require_session<S>(
    State(guard): State<SessionGuard<S>>,
    mut req: Request,
    next: Next,
) -> AuthResult<Response>
where
    S: SessionStore + Send + Sync + 'static,
{
    let token = guard.extract_token(req.headers())?;
    let session = guard.validate(&token).await?;

    req.extensions_mut().insert(CurrentSession(session.session_id));
    req.extensions_mut().insert(CurrentUser(session.user));

    Ok(next.run(req).await)
}

impl<St> FromRequestParts<St> for CurrentUser
where
    St: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::Unauthorized(UnauthorizedReason::MissingToken))
    }
}

impl<St> FromRequestParts<St> for CurrentSession
where
    St: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .copied()
            .ok_or(AuthError::Unauthorized(UnauthorizedReason::MissingToken))
    }
}
