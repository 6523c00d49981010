//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::application::service::AuthService;
use crate::domain::repository::{SessionStore, UserRepository};
use crate::infra::{postgres::PgUserRepository, redis::RedisSessionStore};
use crate::presentation::handlers;
use crate::presentation::middleware::{SessionGuard, require_session};

/// Production router: Postgres users, Redis sessions.
pub fn auth_router(service: AuthService<PgUserRepository, RedisSessionStore>) -> Router {
    auth_router_generic(service)
}

/// Auth router over any store implementation.
///
/// `/register` and `/login` are public; everything else sits behind the
/// session guard.
pub fn auth_router_generic<U, S>(service: AuthService<U, S>) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let guard = SessionGuard::from(&service);

    let protected = Router::new()
        .route("/logout", post(handlers::logout::<U, S>))
        .route("/logout-all", post(handlers::logout_all::<U, S>))
        .route("/session/extend", post(handlers::extend_session::<U, S>))
        .route("/sessions", get(handlers::list_sessions::<U, S>))
        .route("/me", get(handlers::me::<U, S>))
        .route_layer(from_fn_with_state(guard, require_session::<S>));

    Router::new()
        .route("/register", post(handlers::register::<U, S>))
        .route("/login", post(handlers::login::<U, S>))
        .merge(protected)
        .with_state(service)
}
