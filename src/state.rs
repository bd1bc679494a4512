//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Every dependency sits behind a trait object so the same router runs
//! against Postgres in production and the in-memory store in development
//! and tests.

use std::sync::Arc;

use sqlx::PgPool;

use crate::imagegen::ImageGenerator;
use crate::services::drawing::{DrawingStore, PgDrawingStore};
use crate::services::memory::MemoryStore;
use crate::services::session::{PgSessionStore, SessionStore};

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub drawings: Arc<dyn DrawingStore>,
    pub sessions: Arc<dyn SessionStore>,
    /// Optional image client. `None` if image-generation env vars are not configured.
    pub imagegen: Option<Arc<dyn ImageGenerator>>,
}

impl AppState {
    #[must_use]
    pub fn new(
        drawings: Arc<dyn DrawingStore>,
        sessions: Arc<dyn SessionStore>,
        imagegen: Option<Arc<dyn ImageGenerator>>,
    ) -> Self {
        Self { drawings, sessions, imagegen }
    }

    /// State backed by a Postgres pool.
    #[must_use]
    pub fn postgres(pool: PgPool, imagegen: Option<Arc<dyn ImageGenerator>>) -> Self {
        Self::new(Arc::new(PgDrawingStore::new(pool.clone())), Arc::new(PgSessionStore::new(pool)), imagegen)
    }

    /// State backed by a fresh process-local store.
    #[must_use]
    pub fn in_memory(imagegen: Option<Arc<dyn ImageGenerator>>) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, imagegen)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;
