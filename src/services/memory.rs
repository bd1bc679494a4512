//! In-memory store used when no database is configured, and by tests.
//!
//! Implements both [`DrawingStore`] and [`SessionStore`] over one lock so a
//! single `Arc<MemoryStore>` can back the whole [`AppState`](crate::state::AppState).
//! Ids start at 1 and are never reused. Contents are lost on restart.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tokio::sync::RwLock;

use super::drawing::{Drawing, DrawingError, DrawingStore};
use super::session::{self, SessionError, SessionStore, SessionUser};

#[derive(Default)]
struct Inner {
    drawings: BTreeMap<i64, Drawing>,
    last_id: i64,
    users: HashMap<String, Option<String>>,
    /// token -> user id
    sessions: HashMap<String, String>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DrawingStore for MemoryStore {
    async fn list(&self, owner_id: &str) -> Result<Vec<Drawing>, DrawingError> {
        let inner = self.inner.read().await;
        Ok(inner
            .drawings
            .values()
            .rev()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn get(&self, owner_id: &str, id: i64) -> Result<Option<Drawing>, DrawingError> {
        let inner = self.inner.read().await;
        Ok(inner
            .drawings
            .get(&id)
            .filter(|d| d.owner_id == owner_id)
            .cloned())
    }

    async fn insert(&self, owner_id: &str, pixel_data: &str) -> Result<i64, DrawingError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.drawings.insert(
            id,
            Drawing { id, owner_id: owner_id.to_owned(), pixel_data: pixel_data.to_owned(), created_at: Utc::now() },
        );
        Ok(id)
    }

    async fn update(&self, owner_id: &str, id: i64, pixel_data: &str) -> Result<bool, DrawingError> {
        let mut inner = self.inner.write().await;
        match inner.drawings.get_mut(&id) {
            Some(drawing) if drawing.owner_id == owner_id => {
                pixel_data.clone_into(&mut drawing.pixel_data);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, owner_id: &str, id: i64) -> Result<bool, DrawingError> {
        let mut inner = self.inner.write().await;
        if inner.drawings.get(&id).is_some_and(|d| d.owner_id == owner_id) {
            inner.drawings.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[async_trait::async_trait]
impl SessionStore for MemoryStore {
    async fn upsert_user(&self, user_id: &str, email: Option<&str>) -> Result<(), SessionError> {
        let mut inner = self.inner.write().await;
        let entry = inner.users.entry(user_id.to_owned()).or_default();
        if let Some(email) = email {
            *entry = Some(email.to_owned());
        }
        Ok(())
    }

    async fn create_session(&self, user_id: &str) -> Result<String, SessionError> {
        let token = session::generate_token();
        let mut inner = self.inner.write().await;
        inner.users.entry(user_id.to_owned()).or_default();
        inner.sessions.insert(token.clone(), user_id.to_owned());
        Ok(token)
    }

    async fn validate_session(&self, token: &str) -> Result<Option<SessionUser>, SessionError> {
        let inner = self.inner.read().await;
        Ok(inner.sessions.get(token).map(|user_id| SessionUser {
            id: user_id.clone(),
            email: inner.users.get(user_id).cloned().flatten(),
        }))
    }

    async fn delete_session(&self, token: &str) -> Result<(), SessionError> {
        self.inner.write().await.sessions.remove(token);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
