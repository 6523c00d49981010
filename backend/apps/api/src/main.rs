//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{AuthService, PgUserRepository, RedisSessionStore};
use notes::{FsBlobStore, NotesAppState, PgNotesRepository};
use platform::kv::KvClient;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,notes=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::debug!(config = ?config, "Configuration loaded");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_db_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Redis failures are retried per request; startup continues without it
    let kv = Arc::new(KvClient::new(config.kv.clone()));
    kv.connect().await;

    let auth = AuthService::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(RedisSessionStore::new(kv.clone())),
        Arc::new(config.auth.clone()),
    );

    let blob_store = FsBlobStore::new(&config.upload_dir, &config.notes.bucket);
    if let Err(e) = blob_store.init().await {
        tracing::warn!(
            error = %e,
            dir = %blob_store.bucket_dir().display(),
            "Blob store init failed, uploads will fail until it is writable"
        );
    }

    let notes = NotesAppState::new(
        PgNotesRepository::new(pool.clone()),
        blob_store,
        config.notes.clone(),
    );

    let app = app::build_router(auth, notes)
        .layer(TraceLayer::new_for_http())
        .layer(app::cors_layer(&config.frontend_origins));

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Shutting down");
    kv.close().await;
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
