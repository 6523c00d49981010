//! Manage Notes Use Case
//!
//! CRUD and title search over the caller's own notes.

use std::sync::Arc;

use crate::domain::UserId;
use crate::domain::entities::{NewNote, Note, NoteChanges};
use crate::domain::repository::{FolderRepository, NoteRepository};
use crate::domain::value_objects::{FolderId, NoteId};
use crate::error::{NotesError, NotesResult};

#[derive(Debug, Clone)]
pub struct CreateNoteInput {
    pub title: String,
    pub content: String,
    pub file_url: Option<String>,
    pub folder_id: Option<FolderId>,
}

pub struct ManageNotesUseCase<N, F>
where
    N: NoteRepository,
    F: FolderRepository,
{
    note_repo: Arc<N>,
    folder_repo: Arc<F>,
}

impl<N, F> ManageNotesUseCase<N, F>
where
    N: NoteRepository,
    F: FolderRepository,
{
    pub fn new(note_repo: Arc<N>, folder_repo: Arc<F>) -> Self {
        Self {
            note_repo,
            folder_repo,
        }
    }

    pub async fn list(&self, user_id: UserId) -> NotesResult<Vec<Note>> {
        self.note_repo.list(user_id).await
    }

    /// The term is trimmed; a missing or blank term lists every note.
    pub async fn search(&self, user_id: UserId, term: Option<&str>) -> NotesResult<Vec<Note>> {
        match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(term) => self.note_repo.search_by_title(user_id, term).await,
            None => self.note_repo.list(user_id).await,
        }
    }

    pub async fn create(&self, user_id: UserId, input: CreateNoteInput) -> NotesResult<Note> {
        self.ensure_folder(user_id, input.folder_id).await?;

        let note = self
            .note_repo
            .create(NewNote {
                user_id,
                folder_id: input.folder_id,
                title: input.title,
                content: input.content,
                file_url: input.file_url,
            })
            .await?;

        tracing::info!(user_id = %user_id, note_id = %note.id, "Note created");
        Ok(note)
    }

    pub async fn update(
        &self,
        user_id: UserId,
        id: NoteId,
        changes: NoteChanges,
    ) -> NotesResult<Note> {
        self.ensure_folder(user_id, changes.folder_id).await?;

        self.note_repo
            .update(user_id, id, changes)
            .await?
            .ok_or(NotesError::NoteNotFound)
    }

    pub async fn delete(&self, user_id: UserId, id: NoteId) -> NotesResult<Note> {
        let note = self
            .note_repo
            .delete(user_id, id)
            .await?
            .ok_or(NotesError::NoteNotFound)?;

        tracing::info!(user_id = %user_id, note_id = %id, "Note deleted");
        Ok(note)
    }

    /// A referenced folder must belong to the caller.
    pub(crate) async fn ensure_folder(
        &self,
        user_id: UserId,
        folder_id: Option<FolderId>,
    ) -> NotesResult<()> {
        match folder_id {
            Some(id) if !self.folder_repo.exists(user_id, id).await? => {
                Err(NotesError::FolderNotFound)
            }
            _ => Ok(()),
        }
    }
}
