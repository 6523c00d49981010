//! HTTP Handlers
//!
//! Every handler runs behind the session guard and acts only on the
//! caller's own rows.

use std::sync::Arc;

use auth::CurrentUser;
use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;

use crate::application::config::NotesConfig;
use crate::application::{
    CreateNoteInput, ManageFoldersUseCase, ManageNotesUseCase, UploadNoteInput,
    UploadNoteUseCase, UploadedFile,
};
use crate::domain::entities::NoteChanges;
use crate::domain::repository::{BlobStore, FolderRepository, NoteRepository};
use crate::domain::value_objects::{FolderId, NoteId};
use crate::error::{NotesError, NotesResult};
use crate::presentation::dto::{
    CreateFolderRequest, CreateNoteRequest, FolderResponse, FolderWithNotesResponse,
    MoveNoteRequest, NoteResponse, SearchQuery, UpdateFolderRequest, UpdateNoteRequest,
};

/// Shared state for notes and folders handlers
pub struct NotesAppState<R, B>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub blob_store: Arc<B>,
    pub config: Arc<NotesConfig>,
}

impl<R, B> Clone for NotesAppState<R, B>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            blob_store: self.blob_store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, B> NotesAppState<R, B>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    pub fn new(repo: R, blob_store: B, config: NotesConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            blob_store: Arc::new(blob_store),
            config: Arc::new(config),
        }
    }

    fn notes(&self) -> ManageNotesUseCase<R, R> {
        ManageNotesUseCase::new(self.repo.clone(), self.repo.clone())
    }

    fn folders(&self) -> ManageFoldersUseCase<R, R> {
        ManageFoldersUseCase::new(self.repo.clone(), self.repo.clone())
    }
}

// ============================================================================
// Notes
// ============================================================================

/// GET /notes
pub async fn list_notes<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
) -> NotesResult<Json<Vec<NoteResponse>>>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let notes = state.notes().list(user.id).await?;
    Ok(Json(notes.into_iter().map(NoteResponse::from).collect()))
}

/// GET /notes/search?q=
pub async fn search_notes<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<SearchQuery>,
) -> NotesResult<Json<Vec<NoteResponse>>>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let notes = state
        .notes()
        .search(user.id, query.q.as_deref())
        .await?;
    Ok(Json(notes.into_iter().map(NoteResponse::from).collect()))
}

/// POST /notes
pub async fn create_note<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateNoteRequest>,
) -> NotesResult<(StatusCode, Json<NoteResponse>)>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let note = state
        .notes()
        .create(
            user.id,
            CreateNoteInput {
                title: req.title,
                content: req.content,
                file_url: req.file_url,
                folder_id: req.folder_id.map(FolderId::new),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(note.into())))
}

/// PATCH /notes/{id}
pub async fn update_note<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateNoteRequest>,
) -> NotesResult<Json<NoteResponse>>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let changes = NoteChanges {
        title: req.title,
        content: req.content,
        file_url: req.file_url,
        folder_id: req.folder_id.map(FolderId::new),
    };

    let note = state
        .notes()
        .update(user.id, NoteId::new(id), changes)
        .await?;
    Ok(Json(note.into()))
}

/// DELETE /notes/{id}
pub async fn delete_note<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> NotesResult<Json<NoteResponse>>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let note = state.notes().delete(user.id, NoteId::new(id)).await?;
    Ok(Json(note.into()))
}

/// POST /notes/upload (multipart: title, content, folderId?, file)
pub async fn upload_note<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> NotesResult<(StatusCode, Json<NoteResponse>)>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let input = read_upload(multipart, state.config.max_upload_bytes).await?;

    let note = UploadNoteUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.blob_store.clone(),
        state.config.clone(),
    )
    .execute(user.id, input)
    .await?;

    Ok((StatusCode::CREATED, Json(note.into())))
}

async fn read_upload(mut multipart: Multipart, limit: usize) -> NotesResult<UploadNoteInput> {
    let mut title = None;
    let mut content = None;
    let mut folder_id = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => title = Some(field_text(field, limit).await?),
            Some("content") => content = Some(field_text(field, limit).await?),
            Some("folderId") => {
                let raw = field_text(field, limit).await?;
                let raw = raw.trim();
                if !raw.is_empty() {
                    let id = raw.parse::<i64>().map_err(|_| {
                        NotesError::Validation("folderId must be a number".to_string())
                    })?;
                    folder_id = Some(FolderId::new(id));
                }
            }
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, limit))?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok(UploadNoteInput {
        title: title.ok_or_else(|| NotesError::Validation("Title is required".to_string()))?,
        content: content
            .ok_or_else(|| NotesError::Validation("Content is required".to_string()))?,
        folder_id,
        file: file.ok_or_else(|| NotesError::Validation("File is required".to_string()))?,
    })
}

async fn field_text(field: Field<'_>, limit: usize) -> NotesResult<String> {
    field.text().await.map_err(|e| multipart_error(e, limit))
}

fn multipart_error(err: MultipartError, limit: usize) -> NotesError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        NotesError::PayloadTooLarge { limit }
    } else {
        err.into()
    }
}

// ============================================================================
// Folders
// ============================================================================

/// POST /folders
pub async fn create_folder<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateFolderRequest>,
) -> NotesResult<(StatusCode, Json<FolderWithNotesResponse>)>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let folder = state
        .folders()
        .create(user.id, req.name, req.color)
        .await?;
    Ok((StatusCode::CREATED, Json(folder.into())))
}

/// GET /folders
pub async fn list_folders<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
) -> NotesResult<Json<Vec<FolderWithNotesResponse>>>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let folders = state.folders().list(user.id).await?;
    Ok(Json(
        folders
            .into_iter()
            .map(FolderWithNotesResponse::from)
            .collect(),
    ))
}

/// GET /folders/{id}
pub async fn get_folder<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> NotesResult<Json<FolderWithNotesResponse>>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let folder = state.folders().get(user.id, FolderId::new(id)).await?;
    Ok(Json(folder.into()))
}

/// PATCH /folders/{id}
pub async fn update_folder<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateFolderRequest>,
) -> NotesResult<Json<FolderWithNotesResponse>>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let folder = state
        .folders()
        .update(user.id, FolderId::new(id), req.name, req.color)
        .await?;
    Ok(Json(folder.into()))
}

/// DELETE /folders/{id}
pub async fn delete_folder<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> NotesResult<Json<FolderResponse>>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let folder = state.folders().delete(user.id, FolderId::new(id)).await?;
    Ok(Json(folder.into()))
}

/// PUT /folders/notes/{note_id}/move
pub async fn move_note<R, B>(
    State(state): State<NotesAppState<R, B>>,
    CurrentUser(user): CurrentUser,
    Path(note_id): Path<i64>,
    Json(req): Json<MoveNoteRequest>,
) -> NotesResult<Json<NoteResponse>>
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let note = state
        .folders()
        .move_note(user.id, NoteId::new(note_id), req.folder_id.map(FolderId::new))
        .await?;
    Ok(Json(note.into()))
}
