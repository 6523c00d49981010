//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! Every authorization failure on a guarded route renders the same 401 body.
//! The [`UnauthorizedReason`] is only logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::kv::KvError;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Why a guarded request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    /// Neither the session header nor the authorization header carried a token
    MissingToken,
    /// Unknown, expired or malformed session id
    InvalidSession,
    /// The session store failed while validating
    ValidationFailed,
}

impl UnauthorizedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnauthorizedReason::MissingToken => "No session ID provided",
            UnauthorizedReason::InvalidSession => "Invalid session",
            UnauthorizedReason::ValidationFailed => "Session validation failed",
        }
    }
}

impl std::fmt::Display for UnauthorizedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Unauthorized: {0}")]
    Unauthorized(UnauthorizedReason),

    #[error("User not found")]
    UserNotFound,

    /// Input failed value-object validation
    #[error("{0}")]
    Validation(String),

    #[error("Session store error: {0}")]
    SessionStore(#[from] KvError),

    #[error("Stored session is corrupt: {0}")]
    CorruptSession(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::Unauthorized(_) => ErrorKind::Unauthorized,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::SessionStore(e) if e.is_unavailable() => ErrorKind::ServiceUnavailable,
            AuthError::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => {
                ErrorKind::ServiceUnavailable
            }
            AuthError::SessionStore(_)
            | AuthError::CorruptSession(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Client-facing form. Server-side detail stays in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Unauthorized(_) => AppError::unauthorized("Unauthorized")
                .with_action("Sign in to obtain a valid session"),
            AuthError::InvalidCredentials => AppError::unauthorized("Invalid credentials"),
            AuthError::EmailTaken | AuthError::UserNotFound | AuthError::Validation(_) => {
                AppError::new(self.kind(), self.to_string())
            }
            _ if self.kind() == ErrorKind::ServiceUnavailable => {
                AppError::service_unavailable("Service temporarily unavailable")
                    .with_action("Please try again later")
            }
            _ => AppError::internal("Internal server error"),
        }
    }

    fn log(&self) {
        match self {
            AuthError::SessionStore(e) => {
                tracing::error!(error = %e, "Auth session store error");
            }
            AuthError::CorruptSession(e) => {
                tracing::error!(error = %e, "Auth session payload could not be decoded");
            }
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Unauthorized(reason) => {
                tracing::debug!(reason = %reason, "Rejected unauthenticated request");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Value objects validate into `AppError`; bad input stays a 400.
impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(err: redis::RedisError) -> Self {
        AuthError::SessionStore(KvError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::Unauthorized(UnauthorizedReason::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::SessionStore(KvError::Closed).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_unauthorized_reasons_render_identically() {
        let bodies: Vec<String> = [
            UnauthorizedReason::MissingToken,
            UnauthorizedReason::InvalidSession,
            UnauthorizedReason::ValidationFailed,
        ]
        .into_iter()
        .map(|r| AuthError::Unauthorized(r).to_app_error().to_string())
        .collect();

        assert!(bodies.windows(2).all(|w| w[0] == w[1]));
        assert!(!bodies[0].contains("session ID"));
    }

    #[test]
    fn test_infrastructure_detail_is_hidden() {
        let err = AuthError::Internal("connection string with secret".into()).to_app_error();
        assert!(!err.message().contains("secret"));
    }

    #[test]
    fn test_email_taken_message() {
        assert_eq!(
            AuthError::EmailTaken.to_app_error().message(),
            "User with this email already exists"
        );
    }

    #[test]
    fn test_app_error_conversion() {
        let err: AuthError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "Invalid email format"));
    }
}
