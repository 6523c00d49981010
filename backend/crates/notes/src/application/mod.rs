//! Application Layer - Use Cases
//!
//! Orchestrates ownership checks over the repositories and blob store.

pub mod config;
pub mod manage_folders;
pub mod manage_notes;
pub mod upload_note;

pub use config::NotesConfig;
pub use manage_folders::ManageFoldersUseCase;
pub use manage_notes::{CreateNoteInput, ManageNotesUseCase};
pub use upload_note::{UploadNoteInput, UploadNoteUseCase, UploadedFile};
