//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use axum::http::HeaderName;
use platform::password::HashCost;

/// Default session lifetime: 24 hours
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(86_400);

#[derive(Clone)]
pub struct AuthConfig {
    /// Absolute session lifetime, also used by explicit extension
    pub session_ttl: Duration,
    /// Dedicated session header, checked first
    pub session_header: HeaderName,
    /// Scheme word accepted in `Authorization: <scheme> <token>`
    pub auth_scheme: String,
    /// Application-wide secret appended to passwords before hashing
    pub password_pepper: Option<Vec<u8>>,
    pub hash_cost: HashCost,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl: DEFAULT_SESSION_TTL,
            session_header: HeaderName::from_static("x-session-id"),
            auth_scheme: "Session".to_string(),
            password_pepper: None,
            hash_cost: HashCost::default(),
        }
    }
}

impl AuthConfig {
    pub fn development() -> Self {
        Self::default()
    }

    /// Minimal hashing cost so tests stay fast.
    pub fn testing() -> Self {
        Self {
            hash_cost: HashCost::testing(),
            ..Self::default()
        }
    }

    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        self.password_pepper = Some(pepper.into());
        self
    }

    pub fn pepper(&self) -> Option<Vec<u8>> {
        self.password_pepper.clone()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_ttl", &self.session_ttl)
            .field("session_header", &self.session_header)
            .field("auth_scheme", &self.auth_scheme)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}
