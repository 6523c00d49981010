//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::{SafeUser, UserIdentity};
use crate::domain::value_object::SessionId;

// ============================================================================
// Register / Login
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public user shape. `createdAt` is only known after a full user lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<SafeUser> for UserResponse {
    fn from(user: SafeUser) -> Self {
        Self {
            id: user.id.value(),
            email: user.email.into_db(),
            name: user.name.as_str().to_string(),
            created_at: Some(user.created_at),
        }
    }
}

impl From<UserIdentity> for UserResponse {
    fn from(user: UserIdentity) -> Self {
        Self {
            id: user.id.value(),
            email: user.email.into_db(),
            name: user.name.as_str().to_string(),
            created_at: None,
        }
    }
}

/// Register and login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub session_id: String,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(session_id: SessionId, user: impl Into<UserResponse>) -> Self {
        Self {
            session_id: session_id.to_string(),
            user: user.into(),
        }
    }
}

// ============================================================================
// Session management
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutAllResponse {
    pub message: String,
    pub sessions_revoked: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<String>,
}
