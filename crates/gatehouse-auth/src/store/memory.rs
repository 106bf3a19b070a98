//! In-memory stores for single-node development and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::Mutex;

use gatehouse_core::error::AppError;
use gatehouse_core::result::AppResult;
use gatehouse_entity::identity::{Identity, NewIdentity, UserId};
use gatehouse_entity::session::Session;

use super::{IdentityStore, SessionStore};

/// Session store keyed by sid.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<DashMap<String, Session>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: &Session) -> AppResult<()> {
        match self.sessions.entry(session.sid.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict("Session id already exists")),
            Entry::Vacant(slot) => {
                slot.insert(session.clone());
                Ok(())
            }
        }
    }

    async fn find_by_sid(&self, sid: &str) -> AppResult<Option<Session>> {
        Ok(self.sessions.get(sid).map(|s| s.value().clone()))
    }

    async fn delete_by_sid(&self, sid: &str) -> AppResult<bool> {
        Ok(self.sessions.remove(sid).is_some())
    }
}

#[derive(Debug, Default)]
struct IdentityTable {
    /// Identities keyed by login.
    by_login: HashMap<String, Identity>,
    /// Last id handed out.
    last_id: UserId,
}

/// Identity store with sequential ids, mirroring a `BIGSERIAL` column.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    table: Arc<Mutex<IdentityTable>>,
}

impl MemoryIdentityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn create(&self, data: &NewIdentity) -> AppResult<Identity> {
        let mut table = self.table.lock().await;
        if table.by_login.contains_key(&data.login) {
            return Err(AppError::conflict(format!(
                "Login '{}' is already registered",
                data.login
            )));
        }

        table.last_id += 1;
        let identity = Identity {
            id: table.last_id,
            login: data.login.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role.clone(),
            created_at: Utc::now(),
        };
        table.by_login.insert(identity.login.clone(), identity.clone());
        Ok(identity)
    }

    async fn find_by_login(&self, login: &str) -> AppResult<Option<Identity>> {
        Ok(self.table.lock().await.by_login.get(login).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Identity>> {
        let table = self.table.lock().await;
        Ok(table.by_login.values().find(|i| i.id == id).cloned())
    }

    async fn update_role(&self, login: &str, role: &str) -> AppResult<bool> {
        let mut table = self.table.lock().await;
        match table.by_login.get_mut(login) {
            Some(identity) => {
                identity.role = role.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use gatehouse_core::error::ErrorKind;

    use super::*;

    fn new_identity(login: &str) -> NewIdentity {
        NewIdentity {
            login: login.to_string(),
            password_hash: "hash".to_string(),
            role: "user".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_sid_is_conflict() {
        let store = MemorySessionStore::new();
        let session = Session {
            login: "alice".to_string(),
            sid: "sid-1".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        };
        store.insert(&session).await.unwrap();
        let err = store.insert(&session).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let store = MemorySessionStore::new();
        let session = Session {
            login: "alice".to_string(),
            sid: "sid-1".to_string(),
            expires_at: Utc::now(),
        };
        store.insert(&session).await.unwrap();
        assert!(store.delete_by_sid("sid-1").await.unwrap());
        assert!(!store.delete_by_sid("sid-1").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_identity_ids_are_sequential_and_never_reused() {
        let store = MemoryIdentityStore::new();
        let alice = store.create(&new_identity("alice")).await.unwrap();
        let bob = store.create(&new_identity("bob")).await.unwrap();
        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);

        let err = store.create(&new_identity("alice")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let carol = store.create(&new_identity("carol")).await.unwrap();
        assert_eq!(carol.id, 3);
    }

    #[tokio::test]
    async fn test_lookup_and_role_update() {
        let store = MemoryIdentityStore::new();
        let alice = store.create(&new_identity("alice")).await.unwrap();

        assert!(store.update_role("alice", "admin").await.unwrap());
        assert!(!store.update_role("nobody", "admin").await.unwrap());

        let found = store.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(found.role, "admin");
        assert!(store.find_by_login("nobody").await.unwrap().is_none());
        assert!(store.find_by_id(99).await.unwrap().is_none());
    }
}
