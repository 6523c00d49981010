//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, session guard and token extraction.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod token;

pub use middleware::{CurrentSession, CurrentUser, SessionGuard, require_session};
pub use router::{auth_router, auth_router_generic};
pub use token::extract_session_token;
