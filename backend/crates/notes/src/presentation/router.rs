//! Notes and Folders Routers
//!
//! Both routers are guarded as a whole: every route requires a session.

use auth::domain::repository::SessionStore;
use auth::{RedisSessionStore, SessionGuard, require_session};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
};

use crate::domain::repository::{BlobStore, FolderRepository, NoteRepository};
use crate::infra::{blob::FsBlobStore, postgres::PgNotesRepository};
use crate::presentation::handlers::{self, NotesAppState};

pub type PgNotesAppState = NotesAppState<PgNotesRepository, FsBlobStore>;

/// Production notes router: Postgres rows, filesystem blobs, Redis sessions.
pub fn notes_router(state: PgNotesAppState, guard: SessionGuard<RedisSessionStore>) -> Router {
    notes_router_generic(state, guard)
}

/// Production folders router.
pub fn folders_router(state: PgNotesAppState, guard: SessionGuard<RedisSessionStore>) -> Router {
    folders_router_generic(state, guard)
}

/// Mounted at `/notes`.
pub fn notes_router_generic<R, B, S>(state: NotesAppState<R, B>, guard: SessionGuard<S>) -> Router
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route(
            "/",
            get(handlers::list_notes::<R, B>).post(handlers::create_note::<R, B>),
        )
        .route("/search", get(handlers::search_notes::<R, B>))
        .route(
            "/upload",
            post(handlers::upload_note::<R, B>).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/{id}",
            patch(handlers::update_note::<R, B>).delete(handlers::delete_note::<R, B>),
        )
        .route_layer(from_fn_with_state(guard, require_session::<S>))
        .with_state(state)
}

/// Mounted at `/folders`.
pub fn folders_router_generic<R, B, S>(
    state: NotesAppState<R, B>,
    guard: SessionGuard<S>,
) -> Router
where
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_folders::<R, B>).post(handlers::create_folder::<R, B>),
        )
        .route(
            "/{id}",
            get(handlers::get_folder::<R, B>)
                .patch(handlers::update_folder::<R, B>)
                .delete(handlers::delete_folder::<R, B>),
        )
        .route("/notes/{note_id}/move", put(handlers::move_note::<R, B>))
        .route_layer(from_fn_with_state(guard, require_session::<S>))
        .with_state(state)
}
