//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod credential_store;
pub mod service;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use check_session::{CheckSessionUseCase, ValidatedSession};
pub use config::AuthConfig;
pub use credential_store::CredentialStore;
pub use service::AuthService;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
