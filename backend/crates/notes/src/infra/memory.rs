//! In-Memory Implementations
//!
//! Same contracts as the Postgres repository and filesystem blob store,
//! held in process.

use std::collections::HashMap;
use std::io;

use axum::body::Bytes;
use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::UserId;
use crate::domain::entities::{
    Folder, FolderChanges, FolderWithNotes, NewFolder, NewNote, Note, NoteChanges,
};
use crate::domain::repository::{BlobStore, FolderRepository, NoteRepository};
use crate::domain::value_objects::{FolderId, NoteId};
use crate::error::NotesResult;

// ============================================================================
// Notes and folders
// ============================================================================

#[derive(Default)]
struct State {
    notes: Vec<Note>,
    folders: Vec<Folder>,
    last_note_id: i64,
    last_folder_id: i64,
}

impl State {
    fn note_mut(&mut self, user_id: UserId, id: NoteId) -> Option<&mut Note> {
        self.notes
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
    }

    fn folder_with_notes(&self, folder: &Folder) -> FolderWithNotes {
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| n.folder_id == Some(folder.id))
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

        FolderWithNotes {
            folder: folder.clone(),
            notes,
        }
    }
}

/// Notes and folders numbered from 1 in insertion order.
#[derive(Default)]
pub struct MemoryNotesRepository {
    state: RwLock<State>,
}

impl MemoryNotesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut notes: Vec<Note>) -> Vec<Note> {
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        notes
    }
}

impl NoteRepository for MemoryNotesRepository {
    async fn list(&self, user_id: UserId) -> NotesResult<Vec<Note>> {
        let state = self.state.read();
        let notes = state
            .notes
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(notes))
    }

    async fn search_by_title(&self, user_id: UserId, term: &str) -> NotesResult<Vec<Note>> {
        let term = term.to_lowercase();
        let state = self.state.read();
        let notes = state
            .notes
            .iter()
            .filter(|n| n.user_id == user_id && n.title.to_lowercase().contains(&term))
            .cloned()
            .collect();
        Ok(Self::newest_first(notes))
    }

    async fn find(&self, user_id: UserId, id: NoteId) -> NotesResult<Option<Note>> {
        Ok(self
            .state
            .read()
            .notes
            .iter()
            .find(|n| n.id == id && n.user_id == user_id)
            .cloned())
    }

    async fn create(&self, note: NewNote) -> NotesResult<Note> {
        let mut state = self.state.write();
        state.last_note_id += 1;

        let now = Utc::now();
        let created = Note {
            id: NoteId::new(state.last_note_id),
            user_id: note.user_id,
            folder_id: note.folder_id,
            title: note.title,
            content: note.content,
            file_url: note.file_url,
            created_at: now,
            updated_at: now,
        };
        state.notes.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        user_id: UserId,
        id: NoteId,
        changes: NoteChanges,
    ) -> NotesResult<Option<Note>> {
        let mut state = self.state.write();
        let Some(note) = state.note_mut(user_id, id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            note.title = title;
        }
        if let Some(content) = changes.content {
            note.content = content;
        }
        if let Some(file_url) = changes.file_url {
            note.file_url = Some(file_url);
        }
        if let Some(folder_id) = changes.folder_id {
            note.folder_id = Some(folder_id);
        }
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn delete(&self, user_id: UserId, id: NoteId) -> NotesResult<Option<Note>> {
        let mut state = self.state.write();
        let position = state
            .notes
            .iter()
            .position(|n| n.id == id && n.user_id == user_id);
        Ok(position.map(|i| state.notes.remove(i)))
    }

    async fn move_to_folder(
        &self,
        user_id: UserId,
        id: NoteId,
        folder_id: Option<FolderId>,
    ) -> NotesResult<Option<Note>> {
        let mut state = self.state.write();
        Ok(state.note_mut(user_id, id).map(|note| {
            note.folder_id = folder_id;
            note.updated_at = Utc::now();
            note.clone()
        }))
    }
}

impl FolderRepository for MemoryNotesRepository {
    async fn create(&self, folder: NewFolder) -> NotesResult<Folder> {
        let mut state = self.state.write();
        state.last_folder_id += 1;

        let now = Utc::now();
        let created = Folder {
            id: FolderId::new(state.last_folder_id),
            user_id: folder.user_id,
            name: folder.name,
            color: folder.color,
            created_at: now,
            updated_at: now,
        };
        state.folders.push(created.clone());
        Ok(created)
    }

    async fn list_with_notes(&self, user_id: UserId) -> NotesResult<Vec<FolderWithNotes>> {
        let state = self.state.read();
        let mut folders: Vec<&Folder> = state
            .folders
            .iter()
            .filter(|f| f.user_id == user_id)
            .collect();
        folders.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()).then(a.id.cmp(&b.id)));

        Ok(folders
            .into_iter()
            .map(|f| state.folder_with_notes(f))
            .collect())
    }

    async fn find_with_notes(
        &self,
        user_id: UserId,
        id: FolderId,
    ) -> NotesResult<Option<FolderWithNotes>> {
        let state = self.state.read();
        Ok(state
            .folders
            .iter()
            .find(|f| f.id == id && f.user_id == user_id)
            .map(|f| state.folder_with_notes(f)))
    }

    async fn exists(&self, user_id: UserId, id: FolderId) -> NotesResult<bool> {
        Ok(self
            .state
            .read()
            .folders
            .iter()
            .any(|f| f.id == id && f.user_id == user_id))
    }

    async fn update(
        &self,
        user_id: UserId,
        id: FolderId,
        changes: FolderChanges,
    ) -> NotesResult<Option<Folder>> {
        let mut state = self.state.write();
        let Some(folder) = state
            .folders
            .iter_mut()
            .find(|f| f.id == id && f.user_id == user_id)
        else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            folder.name = name;
        }
        if let Some(color) = changes.color {
            folder.color = Some(color);
        }
        folder.updated_at = Utc::now();
        Ok(Some(folder.clone()))
    }

    async fn delete(&self, user_id: UserId, id: FolderId) -> NotesResult<Option<Folder>> {
        let mut state = self.state.write();
        let Some(position) = state
            .folders
            .iter()
            .position(|f| f.id == id && f.user_id == user_id)
        else {
            return Ok(None);
        };

        for note in state.notes.iter_mut().filter(|n| n.folder_id == Some(id)) {
            note.folder_id = None;
        }
        Ok(Some(state.folders.remove(position)))
    }
}

// ============================================================================
// Blobs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Bytes,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, StoredBlob>>,
    unavailable: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<StoredBlob> {
        self.objects.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> NotesResult<()> {
        if self.unavailable {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "blob store offline").into());
        }

        self.objects.write().insert(
            key.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
    async fn delete(&self, key: &str) -> NotesResult<()> {
        if self.unavailable {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "blob store offline").into());
        }

        self.objects.write().remove(key);
        Ok(())
    }
}
