//! Domain Layer - Notes, folders and attachments
//!
//! This layer contains:
//! - Domain entities (Note, Folder)
//! - Domain value objects (ids, folder name and color)
//! - Domain services (attachment key derivation)
//! - Repository and blob store traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use auth::models::user_id::UserId;
