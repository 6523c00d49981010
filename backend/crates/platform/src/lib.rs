//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Password hashing (Argon2id, configurable cost, blocking-pool helpers)
//! - Key-value store client (Redis) with an explicit connect/close lifecycle

pub mod kv;
pub mod password;
