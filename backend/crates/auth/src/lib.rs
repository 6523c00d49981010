//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and store traits
//! - `application/` - Use cases and the [`AuthService`] facade
//! - `infra/` - Postgres users, Redis sessions, in-memory stores for tests
//! - `presentation/` - HTTP handlers, DTOs, router, session guard
//!
//! ## Features
//! - Registration and login with email + password
//! - Opaque server-side sessions (`session:{uuid}` in Redis, 24 h TTL)
//! - Logout, logout from all devices, explicit session extension
//! - [`SessionGuard`] middleware for other crates' routers
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional server-side pepper
//! - Unknown email and wrong password are indistinguishable
//! - Every rejected guarded request gets the same 401 body

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::service::AuthService;
pub use error::{AuthError, AuthResult};
pub use infra::{postgres::PgUserRepository, redis::RedisSessionStore};
pub use presentation::middleware::{CurrentSession, CurrentUser, SessionGuard, require_session};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::memory::{MemorySessionStore, MemoryUserRepository};
    pub use crate::infra::postgres::PgUserRepository;
    pub use crate::infra::redis::RedisSessionStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
