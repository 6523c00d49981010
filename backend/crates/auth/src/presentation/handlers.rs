//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::application::service::AuthService;
use crate::application::{SignInInput, SignUpInput};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::error::{AuthError, AuthResult, UnauthorizedReason};
use crate::presentation::dto::{
    AuthResponse, LoginRequest, LogoutAllResponse, MessageResponse, RegisterRequest,
    SessionsResponse, UserResponse,
};
use crate::presentation::middleware::{CurrentSession, CurrentUser};

// ============================================================================
// Register
// ============================================================================

/// POST /auth/register
pub async fn register<U, S>(
    State(service): State<AuthService<U, S>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<AuthResponse>)>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let output = service
        .register(SignUpInput {
            email: req.email,
            password: req.password,
            name: req.name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(output.session_id, output.user)),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<U, S>(
    State(service): State<AuthService<U, S>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let output = service
        .authenticate(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(AuthResponse::new(output.session_id, output.user)))
}

// ============================================================================
// Session management (guarded)
// ============================================================================

/// POST /auth/logout
pub async fn logout<U, S>(
    State(service): State<AuthService<U, S>>,
    CurrentSession(session_id): CurrentSession,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    service.logout(&session_id).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// POST /auth/logout-all
pub async fn logout_all<U, S>(
    State(service): State<AuthService<U, S>>,
    CurrentUser(user): CurrentUser,
) -> AuthResult<Json<LogoutAllResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let revoked = service.logout_all_sessions(user.id).await?;

    Ok(Json(LogoutAllResponse {
        message: "Logged out from all sessions".to_string(),
        sessions_revoked: revoked,
    }))
}

/// POST /auth/session/extend
///
/// The session can expire between the guard and this call; that is a 401.
pub async fn extend_session<U, S>(
    State(service): State<AuthService<U, S>>,
    CurrentSession(session_id): CurrentSession,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    if !service.extend_session(&session_id).await? {
        return Err(AuthError::Unauthorized(UnauthorizedReason::InvalidSession));
    }
    Ok(Json(MessageResponse::new("Session extended")))
}

/// GET /auth/sessions
pub async fn list_sessions<U, S>(
    State(service): State<AuthService<U, S>>,
    CurrentUser(user): CurrentUser,
) -> AuthResult<Json<SessionsResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let sessions = service
        .active_sessions(user.id)
        .await?
        .iter()
        .map(ToString::to_string)
        .collect();

    Ok(Json(SessionsResponse { sessions }))
}

/// GET /auth/me
pub async fn me<U, S>(
    State(service): State<AuthService<U, S>>,
    CurrentUser(user): CurrentUser,
) -> AuthResult<Json<UserResponse>>
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let user = service.current_user(user.id).await?;
    Ok(Json(user.into()))
}
