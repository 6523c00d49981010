//! Notes Error Types
//!
//! Notes-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type NotesResult<T> = Result<T, NotesError>;

#[derive(Debug, Error)]
pub enum NotesError {
    /// Missing, or owned by someone else
    #[error("Note not found")]
    NoteNotFound,

    /// Missing, or owned by someone else
    #[error("Folder not found")]
    FolderNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The blob store rejected or lost the upload
    #[error("Blob store error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NotesError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            NotesError::NoteNotFound | NotesError::FolderNotFound => ErrorKind::NotFound,
            NotesError::Validation(_) => ErrorKind::BadRequest,
            NotesError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            NotesError::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => {
                ErrorKind::ServiceUnavailable
            }
            NotesError::Storage(_) | NotesError::Database(_) | NotesError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            NotesError::NoteNotFound
            | NotesError::FolderNotFound
            | NotesError::Validation(_)
            | NotesError::PayloadTooLarge { .. } => AppError::new(self.kind(), self.to_string()),
            NotesError::Storage(_) => {
                AppError::internal("File upload failed").with_action("Please try again later")
            }
            _ if self.kind() == ErrorKind::ServiceUnavailable => {
                AppError::service_unavailable("Service temporarily unavailable")
                    .with_action("Please try again later")
            }
            _ => AppError::internal("Internal server error"),
        }
    }

    fn log(&self) {
        match self {
            NotesError::Storage(e) => {
                tracing::error!(error = %e, "Blob store error");
            }
            NotesError::Database(e) => {
                tracing::error!(error = %e, "Notes database error");
            }
            NotesError::Internal(msg) => {
                tracing::error!(message = %msg, "Notes internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Notes client error");
            }
        }
    }
}

impl IntoResponse for NotesError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for NotesError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => NotesError::Validation(err.message().to_string()),
            _ => NotesError::Internal(err.to_string()),
        }
    }
}

impl From<MultipartError> for NotesError {
    fn from(err: MultipartError) -> Self {
        NotesError::Validation(err.body_text())
    }
}
