//! In-Memory Stores
//!
//! Same contracts as the Postgres and Redis implementations, held in
//! process. Session expiry is checked lazily against `tokio::time::Instant`,
//! so tests can drive it with a paused clock.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::time::Instant;

use crate::domain::entity::{
    session::SessionData,
    user::{NewUser, User},
};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::value_object::{SessionId, email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Users
// ============================================================================

/// Users numbered from 1 in insertion order.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> AuthResult<User> {
        let mut users = self.users.write();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }

        let created = User {
            id: UserId::new(users.len() as i64 + 1),
            email: user.email,
            name: user.name,
            password: user.password,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.users.read().iter().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().iter().find(|u| u.id == id).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.users.read().iter().any(|u| &u.email == email))
    }
}

// ============================================================================
// Sessions
// ============================================================================

struct Entry {
    /// Serialized exactly as the Redis store writes it
    payload: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<SessionId, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live sessions across all users.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.read().values().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired entries, then collect live ids owned by `user_id`.
    fn user_sessions(&self, user_id: UserId) -> Vec<SessionId> {
        let now = Instant::now();
        let mut entries = self.entries.write();
        entries.retain(|_, e| e.is_live(now));

        entries
            .iter()
            .filter_map(|(id, e)| match SessionData::from_json(&e.payload) {
                Ok(data) if data.user_id == user_id => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl SessionStore for MemorySessionStore {
    async fn set_session(
        &self,
        id: &SessionId,
        data: &SessionData,
        ttl: Duration,
    ) -> AuthResult<()> {
        let entry = Entry {
            payload: data.to_json()?,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(*id, entry);
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> AuthResult<Option<SessionData>> {
        let now = Instant::now();
        let payload = {
            let mut entries = self.entries.write();
            if entries.get(id).is_some_and(|e| !e.is_live(now)) {
                entries.remove(id);
            }
            entries.get(id).map(|e| e.payload.clone())
        };

        Ok(payload.map(|p| SessionData::from_json(&p)).transpose()?)
    }

    async fn delete_session(&self, id: &SessionId) -> AuthResult<()> {
        self.entries.write().remove(id);
        Ok(())
    }

    async fn extend_session(&self, id: &SessionId, ttl: Duration) -> AuthResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.write();
        match entries.get_mut(id) {
            Some(e) if e.is_live(now) => {
                e.expires_at = now + ttl;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_all_user_sessions(&self, user_id: UserId) -> AuthResult<u64> {
        let ids = self.user_sessions(user_id);
        let mut entries = self.entries.write();
        let deleted = ids.iter().filter(|id| entries.remove(*id).is_some()).count();
        Ok(deleted as u64)
    }

    async fn get_active_sessions(&self, user_id: UserId) -> AuthResult<Vec<SessionId>> {
        Ok(self.user_sessions(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_name::UserName;

    fn data(user_id: i64) -> SessionData {
        SessionData {
            user_id: UserId::new(user_id),
            email: Email::from_db(format!("u{user_id}@x.com")),
            name: UserName::from_db("U"),
        }
    }

    const DAY: Duration = Duration::from_secs(86_400);

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_after_ttl() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();
        store.set_session(&id, &data(1), DAY).await.unwrap();

        tokio::time::advance(DAY - Duration::from_secs(1)).await;
        assert_eq!(store.get_session(&id).await.unwrap(), Some(data(1)));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get_session(&id).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extend_resets_ttl() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();
        store.set_session(&id, &data(1), DAY).await.unwrap();

        tokio::time::advance(Duration::from_secs(80_000)).await;
        assert!(store.extend_session(&id, DAY).await.unwrap());

        tokio::time::advance(Duration::from_secs(80_000)).await;
        assert!(store.get_session(&id).await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_extend_never_resurrects() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();
        assert!(!store.extend_session(&id, DAY).await.unwrap());

        store.set_session(&id, &data(1), Duration::from_secs(5)).await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(!store.extend_session(&id, DAY).await.unwrap());
        assert!(store.get_session(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();
        store.set_session(&id, &data(1), DAY).await.unwrap();
        store.set_session(&id, &data(2), DAY).await.unwrap();

        assert_eq!(store.get_session(&id).await.unwrap(), Some(data(2)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();
        store.set_session(&id, &data(1), DAY).await.unwrap();

        store.delete_session(&id).await.unwrap();
        store.delete_session(&id).await.unwrap();
        assert!(store.get_session(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bulk_delete_only_touches_one_user() {
        let store = MemorySessionStore::new();
        let mine = [SessionId::new(), SessionId::new()];
        let theirs = SessionId::new();
        for id in &mine {
            store.set_session(id, &data(1), DAY).await.unwrap();
        }
        store.set_session(&theirs, &data(2), DAY).await.unwrap();

        let mut active = store.get_active_sessions(UserId::new(1)).await.unwrap();
        active.sort_by_key(|id| *id.as_uuid());
        let mut expected = mine.to_vec();
        expected.sort_by_key(|id| *id.as_uuid());
        assert_eq!(active, expected);

        assert_eq!(store.delete_all_user_sessions(UserId::new(1)).await.unwrap(), 2);
        assert!(store.get_active_sessions(UserId::new(1)).await.unwrap().is_empty());
        assert!(store.get_session(&theirs).await.unwrap().is_some());
        assert_eq!(store.delete_all_user_sessions(UserId::new(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_user_ids_are_sequential_and_emails_unique() {
        use crate::domain::value_object::user_password::UserPassword;

        let repo = MemoryUserRepository::new();
        let new_user = |email: &str| NewUser {
            email: Email::from_db(email),
            name: UserName::from_db("A"),
            password: UserPassword::from_db("$argon2id$stub"),
        };

        assert_eq!(repo.create(new_user("a@x.com")).await.unwrap().id, UserId::new(1));
        assert_eq!(repo.create(new_user("b@x.com")).await.unwrap().id, UserId::new(2));
        assert!(matches!(
            repo.create(new_user("a@x.com")).await,
            Err(AuthError::EmailTaken)
        ));
        assert_eq!(repo.len(), 2);
    }
}
