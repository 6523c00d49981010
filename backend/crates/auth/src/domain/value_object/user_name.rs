//! User Name Value Object
//!
//! Display name shown in the UI. Not unique.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const USER_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err(AppError::bad_request("Name cannot be empty"));
        }

        let len = name.chars().count();
        if len > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters (got {})",
                USER_NAME_MAX_LENGTH, len
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
