//! Key-Value Store Client
//!
//! One Redis client per process, constructed explicitly and shared through
//! `Arc`. Lifecycle:
//!
//! ```text
//! Idle --connect ok--> Ready --close--> Closed
//!  |  ^                                   ^
//!  |  +--connect failed (logged)          |
//!  +--------------------close-------------+
//! ```
//!
//! Startup calls [`KvClient::connect`], which logs a failure and leaves the
//! client `Idle`; the next command retries the connection. Once `Ready`,
//! the underlying [`ConnectionManager`] reconnects on its own with a bounded
//! retry count. Commands after [`KvClient::close`] fail with
//! [`KvError::Closed`].

use std::time::Duration;

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{Client, IntoConnectionInfo};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("key-value store client is closed")]
    Closed,

    #[error("timed out connecting to key-value store after {0:?}")]
    ConnectTimeout(Duration),

    #[error("key-value store error: {0}")]
    Redis(#[from] redis::RedisError),
}

impl KvError {
    /// Whether the store could not be reached at all (as opposed to a
    /// command-level failure).
    pub fn is_unavailable(&self) -> bool {
        match self {
            KvError::Closed | KvError::ConnectTimeout(_) => true,
            KvError::Redis(e) => {
                e.is_io_error()
                    || e.is_timeout()
                    || e.is_connection_refusal()
                    || e.is_connection_dropped()
            }
        }
    }
}

/// Connection settings.
#[derive(Clone)]
pub struct KvConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
    /// Reconnect attempts per failed command
    pub max_retries: usize,
    pub connect_timeout: Duration,
    pub response_timeout: Duration,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            db: 0,
            max_retries: 3,
            connect_timeout: Duration::from_secs(5),
            response_timeout: Duration::from_secs(2),
        }
    }
}

impl KvConfig {
    pub fn development() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<Client, KvError> {
        let mut info = (self.host.as_str(), self.port).into_connection_info()?;
        info.redis.password = self.password.clone();
        info.redis.db = self.db;
        Ok(Client::open(info)?)
    }

    fn manager_config(&self) -> ConnectionManagerConfig {
        ConnectionManagerConfig::new()
            .set_number_of_retries(self.max_retries)
            .set_connection_timeout(self.connect_timeout)
            .set_response_timeout(self.response_timeout)
    }
}

impl std::fmt::Debug for KvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("db", &self.db)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

enum KvState {
    Idle,
    Ready(ConnectionManager),
    Closed,
}

/// Shared Redis client with an explicit connect/close lifecycle.
pub struct KvClient {
    config: KvConfig,
    state: RwLock<KvState>,
}

impl KvClient {
    /// Create an idle client. No I/O happens until [`connect`](Self::connect)
    /// or the first command.
    pub fn new(config: KvConfig) -> Self {
        Self {
            config,
            state: RwLock::new(KvState::Idle),
        }
    }

    /// Try to connect now. Failures are logged and the client stays idle.
    pub async fn connect(&self) {
        match self.connection().await {
            Ok(_) => tracing::info!(
                host = %self.config.host,
                port = self.config.port,
                "Connected to key-value store"
            ),
            Err(e) => tracing::error!(
                host = %self.config.host,
                port = self.config.port,
                error = %e,
                "Key-value store connection failed, will retry on first use"
            ),
        }
    }

    /// Handle to the multiplexed connection, connecting first if needed.
    ///
    /// `ConnectionManager` is cheap to clone; callers issue commands on
    /// their own clone without holding any lock.
    pub async fn connection(&self) -> Result<ConnectionManager, KvError> {
        {
            let state = self.state.read().await;
            match &*state {
                KvState::Ready(conn) => return Ok(conn.clone()),
                KvState::Closed => return Err(KvError::Closed),
                KvState::Idle => {}
            }
        }

        let mut state = self.state.write().await;
        match &*state {
            KvState::Ready(conn) => Ok(conn.clone()),
            KvState::Closed => Err(KvError::Closed),
            KvState::Idle => {
                let conn = self.open().await?;
                *state = KvState::Ready(conn.clone());
                Ok(conn)
            }
        }
    }

    async fn open(&self) -> Result<ConnectionManager, KvError> {
        let client = self.config.client()?;
        let timeout = self.config.connect_timeout;
        tokio::time::timeout(
            timeout,
            ConnectionManager::new_with_config(client, self.config.manager_config()),
        )
        .await
        .map_err(|_| KvError::ConnectTimeout(timeout))?
        .map_err(KvError::from)
    }

    /// Drop the connection. Subsequent commands fail fast.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        if matches!(*state, KvState::Ready(_)) {
            tracing::info!("Key-value store connection closed");
        }
        *state = KvState::Closed;
    }

    pub async fn is_closed(&self) -> bool {
        matches!(*self.state.read().await, KvState::Closed)
    }
}
