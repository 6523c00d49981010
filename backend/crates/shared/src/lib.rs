//! Shared Kernel
//!
//! Vocabulary that every backend crate agrees on:
//! - The unified [`error::app_error::AppError`] and its [`error::kind::ErrorKind`]
//! - Conversions from infrastructure errors (JSON, database, key-value store)
//! - Typed UUID identifiers
//!
//! Only things whose meaning is identical in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
