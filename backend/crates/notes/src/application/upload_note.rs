//! Upload Note Use Case
//!
//! Stores an attachment in the blob store, then creates a note pointing at it.

use std::sync::Arc;

use axum::body::Bytes;

use crate::application::config::NotesConfig;
use crate::application::manage_notes::{CreateNoteInput, ManageNotesUseCase};
use crate::domain::UserId;
use crate::domain::entities::Note;
use crate::domain::repository::{BlobStore, FolderRepository, NoteRepository};
use crate::domain::services::blob_key;
use crate::domain::value_objects::FolderId;
use crate::error::NotesResult;

pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

pub struct UploadNoteInput {
    pub title: String,
    pub content: String,
    pub folder_id: Option<FolderId>,
    pub file: UploadedFile,
}

pub struct UploadNoteUseCase<N, F, B>
where
    N: NoteRepository,
    F: FolderRepository,
    B: BlobStore,
{
    notes: ManageNotesUseCase<N, F>,
    blob_store: Arc<B>,
    config: Arc<NotesConfig>,
}

impl<N, F, B> UploadNoteUseCase<N, F, B>
where
    N: NoteRepository,
    F: FolderRepository,
    B: BlobStore,
{
    pub fn new(
        note_repo: Arc<N>,
        folder_repo: Arc<F>,
        blob_store: Arc<B>,
        config: Arc<NotesConfig>,
    ) -> Self {
        Self {
            notes: ManageNotesUseCase::new(note_repo, folder_repo),
            blob_store,
            config,
        }
    }

    /// The folder is checked before anything is written.
    pub async fn execute(&self, user_id: UserId, input: UploadNoteInput) -> NotesResult<Note> {
        self.notes.ensure_folder(user_id, input.folder_id).await?;

        let key = blob_key(input.file.file_name.as_deref());
        let size = input.file.bytes.len();
        self.blob_store
            .put(&key, input.file.bytes, &input.file.content_type)
            .await?;

        tracing::info!(user_id = %user_id, key = %key, size, "Attachment stored");

        let created = self
            .notes
            .create(
                user_id,
                CreateNoteInput {
                    title: input.title,
                    content: input.content,
                    file_url: Some(self.config.file_url(&key)),
                    folder_id: input.folder_id,
                },
            )
            .await;

        if created.is_err() {
            self.discard(&key).await;
        }
        created
    }

    /// Best effort; a failure leaves the object behind and names it.
    async fn discard(&self, key: &str) {
        match self.blob_store.delete(key).await {
            Ok(()) => tracing::warn!(key, "Note insert failed, attachment removed"),
            Err(e) => tracing::warn!(key, error = %e, "Note insert failed, attachment orphaned"),
        }
    }
}
