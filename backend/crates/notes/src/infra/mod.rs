//! Infrastructure Layer
//!
//! - `postgres`: notes and folders
//! - `blob`: attachment storage on the local filesystem
//! - `memory`: in-process implementations for tests

pub mod blob;
pub mod memory;
pub mod postgres;

pub use blob::FsBlobStore;
pub use memory::{MemoryBlobStore, MemoryNotesRepository};
pub use postgres::PgNotesRepository;
