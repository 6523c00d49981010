//! Router assembly
//!
//! `/auth` carries its own guard on the protected routes; `/notes` and
//! `/folders` are guarded by a `SessionGuard` sharing the auth service's
//! session store.

use auth::domain::repository::{SessionStore, UserRepository};
use auth::router::auth_router_generic;
use auth::{AuthService, SessionGuard};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use kernel::error::app_error::AppError;
use notes::NotesAppState;
use notes::domain::repository::{BlobStore, FolderRepository, NoteRepository};
use notes::presentation::router::{folders_router_generic, notes_router_generic};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

pub fn build_router<U, S, R, B>(auth: AuthService<U, S>, notes: NotesAppState<R, B>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
    R: NoteRepository + FolderRepository + Send + Sync + 'static,
    B: BlobStore + Send + Sync + 'static,
{
    let guard = SessionGuard::from(&auth);

    Router::new()
        .nest("/auth", auth_router_generic(auth))
        .nest("/notes", notes_router_generic(notes.clone(), guard.clone()))
        .nest("/folders", folders_router_generic(notes, guard))
        .fallback(route_not_found)
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-session-id"),
        ]))
}
