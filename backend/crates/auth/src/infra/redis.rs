//! Redis Session Store
//!
//! Layout: `session:{uuid}` -> `{"userId":..,"email":..,"name":..}` with a
//! TTL. Redis enforces expiry.
//!
//! Per-user operations walk the keyspace with `SCAN`, so they are
//! O(total sessions). There is no user -> sessions index.

use std::sync::Arc;
use std::time::Duration;

use ::redis::AsyncCommands;
use ::redis::aio::ConnectionManager;
use platform::kv::KvClient;

use crate::domain::entity::session::SessionData;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::{SessionId, user_id::UserId};
use crate::error::AuthResult;

pub const SESSION_KEY_PREFIX: &str = "session:";

/// Keys requested per `SCAN` round trip
const SCAN_BATCH: usize = 100;

#[derive(Clone)]
pub struct RedisSessionStore {
    client: Arc<KvClient>,
}

impl RedisSessionStore {
    pub fn new(client: Arc<KvClient>) -> Self {
        Self { client }
    }

    async fn connection(&self) -> AuthResult<ConnectionManager> {
        Ok(self.client.connection().await?)
    }

    /// Keys of every live session owned by `user_id`.
    ///
    /// Keys that expire mid-scan are skipped; undecodable payloads are
    /// logged and skipped.
    async fn scan_user_keys(
        &self,
        conn: &mut ConnectionManager,
        user_id: UserId,
    ) -> AuthResult<Vec<String>> {
        let pattern = format!("{SESSION_KEY_PREFIX}*");
        let mut matched = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = ::redis::cmd("SCAN")
                .cursor_arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await?;

            for key in keys {
                let raw: Option<String> = conn.get(&key).await?;
                let Some(raw) = raw else { continue };

                match SessionData::from_json(&raw) {
                    Ok(data) if data.user_id == user_id => matched.push(key),
                    Ok(_) => {}
                    Err(e) => tracing::warn!(key = %key, error = %e, "Skipping undecodable session"),
                }
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        Ok(matched)
    }
}

fn session_key(id: &SessionId) -> String {
    format!("{SESSION_KEY_PREFIX}{id}")
}

/// Redis TTLs are whole seconds and must be positive.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

impl SessionStore for RedisSessionStore {
    async fn set_session(
        &self,
        id: &SessionId,
        data: &SessionData,
        ttl: Duration,
    ) -> AuthResult<()> {
        let payload = data.to_json()?;
        let mut conn = self.connection().await?;
        let _: () = conn.set_ex(session_key(id), payload, ttl_secs(ttl)).await?;
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> AuthResult<Option<SessionData>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(session_key(id)).await?;

        Ok(raw.map(|r| SessionData::from_json(&r)).transpose()?)
    }

    async fn delete_session(&self, id: &SessionId) -> AuthResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(session_key(id)).await?;
        Ok(())
    }

    async fn extend_session(&self, id: &SessionId, ttl: Duration) -> AuthResult<bool> {
        let mut conn = self.connection().await?;
        // EXPIRE on a missing key is a no-op returning 0
        let extended: bool = conn.expire(session_key(id), ttl_secs(ttl) as i64).await?;
        Ok(extended)
    }

    async fn delete_all_user_sessions(&self, user_id: UserId) -> AuthResult<u64> {
        let mut conn = self.connection().await?;
        let keys = self.scan_user_keys(&mut conn, user_id).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: u64 = conn.del(&keys).await?;
        Ok(deleted)
    }

    async fn get_active_sessions(&self, user_id: UserId) -> AuthResult<Vec<SessionId>> {
        let mut conn = self.connection().await?;
        let keys = self.scan_user_keys(&mut conn, user_id).await?;

        Ok(keys
            .iter()
            .filter_map(|key| key.strip_prefix(SESSION_KEY_PREFIX)?.parse().ok())
            .collect())
    }
}
