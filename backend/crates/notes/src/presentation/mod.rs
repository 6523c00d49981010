//! Presentation Layer
//!
//! HTTP handlers, DTOs and routers. Authorization comes from
//! `auth::SessionGuard`.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::NotesAppState;
pub use router::{folders_router, folders_router_generic, notes_router, notes_router_generic};
