//! Notes Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Notes, folders, repository and blob store traits
//! - `application/` - Use cases
//! - `infra/` - Postgres, filesystem blobs, in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! Every route is protected by the auth crate's session guard, and every
//! query is scoped to the authenticated user. Another user's note or folder
//! is reported as not found.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::NotesConfig;
pub use error::{NotesError, NotesResult};
pub use infra::{blob::FsBlobStore, postgres::PgNotesRepository};
pub use presentation::handlers::NotesAppState;
pub use presentation::router::{folders_router, notes_router};

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::blob::FsBlobStore;
    pub use crate::infra::memory::{MemoryBlobStore, MemoryNotesRepository};
    pub use crate::infra::postgres::PgNotesRepository;
}

#[cfg(test)]
mod tests;
