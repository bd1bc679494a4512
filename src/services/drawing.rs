//! Drawing service: owner-scoped persistence of pixel matrices.
//!
//! DESIGN
//! ======
//! A drawing row is `(id, owner_id, pixel_data, created_at)`. The server
//! treats `pixel_data` as an opaque string; only the editor and the list
//! endpoint's `gridSize` hint ever decode it. Every query carries the owner
//! id, so a drawing belonging to someone else is indistinguishable from one
//! that does not exist.
//!
//! CONCURRENCY
//! ===========
//! No version column and no compare-and-swap: two saves to the same id both
//! succeed and the later one wins.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DrawingError {
    #[error("pixel data is required")]
    MissingPixelData,
    #[error("drawing not found: {0}")]
    NotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A stored drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub id: i64,
    pub owner_id: String,
    pub pixel_data: String,
    pub created_at: DateTime<Utc>,
}

/// Input to [`save_drawing`]. An absent id creates a new row.
#[derive(Debug, Clone, Default)]
pub struct SaveDrawing {
    pub id: Option<i64>,
    pub pixel_data: Option<String>,
}

/// Owner-scoped drawing persistence.
#[async_trait::async_trait]
pub trait DrawingStore: Send + Sync {
    /// All drawings owned by `owner_id`, newest first.
    async fn list(&self, owner_id: &str) -> Result<Vec<Drawing>, DrawingError>;

    /// One drawing, or `None` when it is missing or owned by someone else.
    async fn get(&self, owner_id: &str, id: i64) -> Result<Option<Drawing>, DrawingError>;

    /// Insert a new row and return its id.
    async fn insert(&self, owner_id: &str, pixel_data: &str) -> Result<i64, DrawingError>;

    /// Overwrite `pixel_data` of an owned row. Returns `false` if nothing matched.
    async fn update(&self, owner_id: &str, id: i64, pixel_data: &str) -> Result<bool, DrawingError>;

    /// Delete an owned row. Returns `false` if nothing matched.
    async fn delete(&self, owner_id: &str, id: i64) -> Result<bool, DrawingError>;
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create or update a drawing for `owner_id`, returning the row id.
///
/// # Errors
///
/// `MissingPixelData` when the payload is absent or blank, `NotFound` when an
/// id is given that the owner does not have, or a database error.
pub async fn save_drawing(store: &dyn DrawingStore, owner_id: &str, req: SaveDrawing) -> Result<i64, DrawingError> {
    let pixel_data = req
        .pixel_data
        .filter(|data| !data.trim().is_empty())
        .ok_or(DrawingError::MissingPixelData)?;

    match req.id {
        Some(id) => {
            if !store.update(owner_id, id, &pixel_data).await? {
                return Err(DrawingError::NotFound(id));
            }
            tracing::debug!(%owner_id, id, "drawing updated");
            Ok(id)
        }
        None => {
            let id = store.insert(owner_id, &pixel_data).await?;
            tracing::debug!(%owner_id, id, "drawing created");
            Ok(id)
        }
    }
}

/// Load one owned drawing.
///
/// # Errors
///
/// `NotFound` when the drawing is missing or not owned, or a database error.
pub async fn load_drawing(store: &dyn DrawingStore, owner_id: &str, id: i64) -> Result<Drawing, DrawingError> {
    store
        .get(owner_id, id)
        .await?
        .ok_or(DrawingError::NotFound(id))
}

/// Delete one owned drawing.
///
/// # Errors
///
/// `NotFound` when the drawing is missing or not owned, or a database error.
pub async fn delete_drawing(store: &dyn DrawingStore, owner_id: &str, id: i64) -> Result<(), DrawingError> {
    if !store.delete(owner_id, id).await? {
        return Err(DrawingError::NotFound(id));
    }
    tracing::debug!(%owner_id, id, "drawing deleted");
    Ok(())
}

// =============================================================================
// POSTGRES
// =============================================================================

pub struct PgDrawingStore {
    pool: PgPool,
}

impl PgDrawingStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type DrawingRow = (i64, String, String, DateTime<Utc>);

fn from_row((id, owner_id, pixel_data, created_at): DrawingRow) -> Drawing {
    Drawing { id, owner_id, pixel_data, created_at }
}

#[async_trait::async_trait]
impl DrawingStore for PgDrawingStore {
    async fn list(&self, owner_id: &str) -> Result<Vec<Drawing>, DrawingError> {
        let rows = sqlx::query_as::<_, DrawingRow>(
            "SELECT id, owner_id, pixel_data, created_at
             FROM drawings
             WHERE owner_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn get(&self, owner_id: &str, id: i64) -> Result<Option<Drawing>, DrawingError> {
        let row = sqlx::query_as::<_, DrawingRow>(
            "SELECT id, owner_id, pixel_data, created_at
             FROM drawings
             WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(from_row))
    }

    async fn insert(&self, owner_id: &str, pixel_data: &str) -> Result<i64, DrawingError> {
        let id = sqlx::query_scalar::<_, i64>("INSERT INTO drawings (owner_id, pixel_data) VALUES ($1, $2) RETURNING id")
            .bind(owner_id)
            .bind(pixel_data)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn update(&self, owner_id: &str, id: i64, pixel_data: &str) -> Result<bool, DrawingError> {
        let result = sqlx::query("UPDATE drawings SET pixel_data = $3 WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .bind(pixel_data)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, owner_id: &str, id: i64) -> Result<bool, DrawingError> {
        let result = sqlx::query("DELETE FROM drawings WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[path = "drawing_test.rs"]
mod tests;
