//! User Password Value Object
//!
//! Domain wrappers over `platform::password`:
//! - [`RawPassword`]: user input, zeroized on drop
//! - [`UserPassword`]: Argon2id PHC string, safe to persist
//!
//! Hashing and verification run on the blocking pool.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    self, ClearTextPassword, HashCost, HashedPassword, PasswordHashError, PasswordPolicyError,
};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate user input. Errors carry client-facing messages.
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooLong { max, actual } => AppError::bad_request(format!(
                "Password must be at most {} characters (got {})",
                max, actual
            ))
            .with_action("Please choose a shorter password"),

            PasswordPolicyError::EmptyOrWhitespace => {
                AppError::bad_request("Password cannot be empty")
                    .with_action("Please enter a password")
            }

            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
                    .with_action("Please remove any special control characters")
            }
        })?;

        Ok(Self(clear_text))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a validated password with a fresh salt.
    pub async fn hash(
        raw: RawPassword,
        pepper: Option<Vec<u8>>,
        cost: HashCost,
    ) -> AppResult<Self> {
        let hashed = password::hash_password(raw.0, pepper, cost)
            .await
            .map_err(|e| match e {
                PasswordHashError::InvalidParams(msg) => {
                    AppError::internal(format!("Invalid password hashing parameters: {msg}"))
                }
                other => AppError::internal("Password hashing failed").with_source(other),
            })?;

        Ok(Self(hashed))
    }

    /// Stored PHC string. Not parsed here; a corrupt value just never
    /// verifies.
    pub fn from_db(phc_string: impl Into<String>) -> Self {
        Self(HashedPassword::from_stored(phc_string))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time verification. Never fails; mismatch is `false`.
    pub async fn verify(&self, raw: RawPassword, pepper: Option<Vec<u8>>) -> bool {
        password::verify_password(self.0.clone(), raw.0, pepper).await
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}
