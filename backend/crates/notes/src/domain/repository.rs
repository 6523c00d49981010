//! Repository Traits
//!
//! Interfaces for persistence. Every lookup is scoped to the owning user;
//! a row owned by someone else behaves exactly like a missing one.

use axum::body::Bytes;

use crate::domain::UserId;
use crate::domain::entities::{
    Folder, FolderChanges, FolderWithNotes, NewFolder, NewNote, Note, NoteChanges,
};
use crate::domain::value_objects::{FolderId, NoteId};
use crate::error::NotesResult;

#[trait_variant::make(NoteRepository: Send)]
pub trait LocalNoteRepository {
    /// Newest first
    async fn list(&self, user_id: UserId) -> NotesResult<Vec<Note>>;

    /// Case-insensitive substring match on the title, newest first
    async fn search_by_title(&self, user_id: UserId, term: &str) -> NotesResult<Vec<Note>>;

    async fn find(&self, user_id: UserId, id: NoteId) -> NotesResult<Option<Note>>;

    async fn create(&self, note: NewNote) -> NotesResult<Note>;

    async fn update(
        &self,
        user_id: UserId,
        id: NoteId,
        changes: NoteChanges,
    ) -> NotesResult<Option<Note>>;

    /// Returns the deleted note
    async fn delete(&self, user_id: UserId, id: NoteId) -> NotesResult<Option<Note>>;

    /// `None` moves the note to the root
    async fn move_to_folder(
        &self,
        user_id: UserId,
        id: NoteId,
        folder_id: Option<FolderId>,
    ) -> NotesResult<Option<Note>>;
}

#[trait_variant::make(FolderRepository: Send)]
pub trait LocalFolderRepository {
    async fn create(&self, folder: NewFolder) -> NotesResult<Folder>;

    /// Ordered by name
    async fn list_with_notes(&self, user_id: UserId) -> NotesResult<Vec<FolderWithNotes>>;

    async fn find_with_notes(
        &self,
        user_id: UserId,
        id: FolderId,
    ) -> NotesResult<Option<FolderWithNotes>>;

    async fn exists(&self, user_id: UserId, id: FolderId) -> NotesResult<bool>;

    async fn update(
        &self,
        user_id: UserId,
        id: FolderId,
        changes: FolderChanges,
    ) -> NotesResult<Option<Folder>>;

    /// Detaches the folder's notes to the root, then deletes it.
    async fn delete(&self, user_id: UserId, id: FolderId) -> NotesResult<Option<Folder>>;
}

/// Object storage for attachments.
#[trait_variant::make(BlobStore: Send)]
pub trait LocalBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> NotesResult<()>;

    /// Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> NotesResult<()>;
}
