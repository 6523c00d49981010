//! Domain Entities

use chrono::{DateTime, Utc};

use crate::domain::UserId;
use crate::domain::value_objects::{FolderColor, FolderId, FolderName, NoteId};

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub user_id: UserId,
    /// `None` means the note sits at the root
    pub folder_id: Option<FolderId>,
    pub title: String,
    pub content: String,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub user_id: UserId,
    pub folder_id: Option<FolderId>,
    pub title: String,
    pub content: String,
    pub file_url: Option<String>,
}

/// Partial update. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub folder_id: Option<FolderId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub id: FolderId,
    pub user_id: UserId,
    pub name: FolderName,
    pub color: Option<FolderColor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFolder {
    pub user_id: UserId,
    pub name: FolderName,
    pub color: Option<FolderColor>,
}

#[derive(Debug, Clone, Default)]
pub struct FolderChanges {
    pub name: Option<FolderName>,
    pub color: Option<FolderColor>,
}

/// A folder with its notes, most recently updated first.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderWithNotes {
    pub folder: Folder,
    pub notes: Vec<Note>,
}

impl FolderWithNotes {
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}
