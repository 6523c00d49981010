//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Folder, FolderWithNotes, Note};

// ============================================================================
// Notes
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    pub file_url: Option<String>,
    pub folder_id: Option<i64>,
}

/// Absent and `null` fields are both left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub folder_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub file_url: Option<String>,
    pub folder_id: Option<i64>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id.value(),
            title: note.title,
            content: note.content,
            file_url: note.file_url,
            folder_id: note.folder_id.map(|id| id.value()),
            user_id: note.user_id.value(),
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

// ============================================================================
// Folders
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// `{"folderId": null}` (or an empty body) moves the note to the root.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveNoteRequest {
    #[serde(default)]
    pub folder_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id.value(),
            name: folder.name.as_str().to_string(),
            color: folder.color.map(|c| c.as_str().to_string()),
            user_id: folder.user_id.value(),
            created_at: folder.created_at,
            updated_at: folder.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderWithNotesResponse {
    #[serde(flatten)]
    pub folder: FolderResponse,
    pub notes: Vec<NoteResponse>,
    pub note_count: usize,
}

impl From<FolderWithNotes> for FolderWithNotesResponse {
    fn from(value: FolderWithNotes) -> Self {
        let note_count = value.note_count();
        Self {
            folder: value.folder.into(),
            notes: value.notes.into_iter().map(NoteResponse::from).collect(),
            note_count,
        }
    }
}
