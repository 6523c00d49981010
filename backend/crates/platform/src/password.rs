//! Password Hashing and Verification
//!
//! - Argon2id hashing with configurable cost ([`HashCost`])
//! - Zeroization of clear text on drop
//! - Constant-time verification (inside `argon2`)
//! - Optional application-wide pepper
//!
//! Argon2 is deliberately slow, so the async helpers [`hash_password`] and
//! [`verify_password`] run it on the blocking pool.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum password length in code points.
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid Argon2 parameters: {0}")]
    InvalidParams(String),

    #[error("Hashing task did not complete: {0}")]
    TaskFailed(String),
}

// ============================================================================
// Cost parameters
// ============================================================================

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory in KiB
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    /// OWASP baseline: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashCost {
    /// Smallest parameters argon2 accepts. Tests only.
    pub const fn testing() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordHashError::InvalidParams(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password, zeroized on drop.
///
/// Not `Clone`; `Debug` is redacted.
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("pw".to_string()).unwrap();
/// assert_eq!(format!("{password:?}"), "ClearTextPassword(\"[REDACTED]\")");
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalizes to NFKC, then checks: not blank, at most
    /// [`MAX_PASSWORD_LENGTH`] code points, no control characters other
    /// than tab and newline.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.0.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash with a fresh 128-bit salt. Returns a PHC string.
    pub fn hash(
        &self,
        pepper: Option<&[u8]>,
        cost: HashCost,
    ) -> Result<HashedPassword, PasswordHashError> {
        let mut input = self.peppered(pepper);
        let salt = SaltString::generate(&mut OsRng);
        let result = cost
            .argon2()?
            .hash_password(&input, &salt)
            .map(|hash| HashedPassword {
                hash: hash.to_string(),
            })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));
        input.zeroize();
        result
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format (algorithm, version, params, salt, hash).
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a stored PHC string without parsing it. A malformed value
    /// simply never verifies.
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Constant-time check. Mismatch and malformed hashes both yield `false`.
    ///
    /// Parameters are read from the PHC string, so hashes produced with an
    /// older [`HashCost`] still verify.
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };
        let mut input = password.peppered(pepper);
        let ok = Argon2::default().verify_password(&input, &parsed).is_ok();
        input.zeroize();
        ok
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Async helpers
// ============================================================================

/// Hash on the blocking pool.
pub async fn hash_password(
    password: ClearTextPassword,
    pepper: Option<Vec<u8>>,
    cost: HashCost,
) -> Result<HashedPassword, PasswordHashError> {
    tokio::task::spawn_blocking(move || password.hash(pepper.as_deref(), cost))
        .await
        .map_err(|e| PasswordHashError::TaskFailed(e.to_string()))?
}

/// Verify on the blocking pool. Never fails: a crashed task counts as a
/// mismatch.
pub async fn verify_password(
    hashed: HashedPassword,
    password: ClearTextPassword,
    pepper: Option<Vec<u8>>,
) -> bool {
    match tokio::task::spawn_blocking(move || hashed.verify(&password, pepper.as_deref())).await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::error!(error = %e, "Password verification task failed");
            false
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
