//! Domain Value Objects

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Database-assigned note id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database-assigned folder id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(i64);

impl FolderId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Folder display name: trimmed, 1 to 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FolderName(String);

impl FolderName {
    pub const MAX_LENGTH: usize = 100;

    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into();
        let name = name.trim();

        if name.is_empty() {
            return Err(AppError::bad_request("Folder name cannot be empty")
                .with_action("Please enter a folder name"));
        }

        if name.chars().count() > Self::MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Folder name must be at most {} characters",
                Self::MAX_LENGTH
            )));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `#RGB` or `#RRGGBB`, stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FolderColor(String);

impl FolderColor {
    pub fn new(color: impl Into<String>) -> AppResult<Self> {
        let color = color.into();
        let valid = color
            .strip_prefix('#')
            .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));

        if !valid {
            return Err(AppError::bad_request("Color must be a hex color")
                .with_action("Use #RGB or #RRGGBB, for example #FF5733"));
        }

        Ok(Self(color))
    }

    pub fn from_db(color: impl Into<String>) -> Self {
        Self(color.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        for ok in ["#fff", "#FF5733", "#a1B2c3"] {
            assert!(FolderColor::new(ok).is_ok(), "{ok}");
        }
        for bad in ["fff", "#ff", "#ffff", "#GGGGGG", "#FF57331", "red", ""] {
            assert!(FolderColor::new(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_folder_name() {
        assert_eq!(FolderName::new("  Work ").unwrap().as_str(), "Work");
        assert!(FolderName::new("   ").is_err());
        assert!(FolderName::new("x".repeat(FolderName::MAX_LENGTH + 1)).is_err());
    }
}
