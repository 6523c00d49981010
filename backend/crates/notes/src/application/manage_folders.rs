//! Manage Folders Use Case

use std::sync::Arc;

use crate::domain::UserId;
use crate::domain::entities::{Folder, FolderChanges, FolderWithNotes, NewFolder, Note};
use crate::domain::repository::{FolderRepository, NoteRepository};
use crate::domain::value_objects::{FolderColor, FolderId, FolderName, NoteId};
use crate::error::{NotesError, NotesResult};

pub struct ManageFoldersUseCase<N, F>
where
    N: NoteRepository,
    F: FolderRepository,
{
    note_repo: Arc<N>,
    folder_repo: Arc<F>,
}

impl<N, F> ManageFoldersUseCase<N, F>
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

    pub async fn create(
        &self,
        user_id: UserId,
        name: String,
        color: Option<String>,
    ) -> NotesResult<FolderWithNotes> {
        let folder = self
            .folder_repo
            .create(NewFolder {
                user_id,
                name: FolderName::new(name)?,
                color: color.map(FolderColor::new).transpose()?,
            })
            .await?;

        tracing::info!(user_id = %user_id, folder_id = %folder.id, "Folder created");
        Ok(FolderWithNotes {
            folder,
            notes: Vec::new(),
        })
    }

    pub async fn list(&self, user_id: UserId) -> NotesResult<Vec<FolderWithNotes>> {
        self.folder_repo.list_with_notes(user_id).await
    }

    pub async fn get(&self, user_id: UserId, id: FolderId) -> NotesResult<FolderWithNotes> {
        self.folder_repo
            .find_with_notes(user_id, id)
            .await?
            .ok_or(NotesError::FolderNotFound)
    }

    pub async fn update(
        &self,
        user_id: UserId,
        id: FolderId,
        name: Option<String>,
        color: Option<String>,
    ) -> NotesResult<FolderWithNotes> {
        let changes = FolderChanges {
            name: name.map(FolderName::new).transpose()?,
            color: color.map(FolderColor::new).transpose()?,
        };

        self.folder_repo
            .update(user_id, id, changes)
            .await?
            .ok_or(NotesError::FolderNotFound)?;

        self.get(user_id, id).await
    }

    /// Notes inside survive at the root.
    pub async fn delete(&self, user_id: UserId, id: FolderId) -> NotesResult<Folder> {
        let folder = self
            .folder_repo
            .delete(user_id, id)
            .await?
            .ok_or(NotesError::FolderNotFound)?;

        tracing::info!(user_id = %user_id, folder_id = %id, "Folder deleted");
        Ok(folder)
    }

    /// Note ownership is checked before folder ownership.
    pub async fn move_note(
        &self,
        user_id: UserId,
        note_id: NoteId,
        folder_id: Option<FolderId>,
    ) -> NotesResult<Note> {
        if self.note_repo.find(user_id, note_id).await?.is_none() {
            return Err(NotesError::NoteNotFound);
        }

        if let Some(folder_id) = folder_id {
            if !self.folder_repo.exists(user_id, folder_id).await? {
                return Err(NotesError::FolderNotFound);
            }
        }

        self.note_repo
            .move_to_folder(user_id, note_id, folder_id)
            .await?
            .ok_or(NotesError::NoteNotFound)
    }
}
