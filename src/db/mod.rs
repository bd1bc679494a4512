//! Database initialization and migration runner.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup calls [`init_pool`] only when `DATABASE_URL` is set. Without it
//! the server runs on the in-memory store instead, so nothing here is on the
//! test path except the pool sizing rule.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Pool size from `DB_MAX_CONNECTIONS`; zero or garbage falls back to the default.
fn max_connections(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
}

/// Connect to `PostgreSQL` and apply the embedded migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let max = max_connections(std::env::var("DB_MAX_CONNECTIONS").ok().as_deref());
    let pool = PgPoolOptions::new()
        .max_connections(max)
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;
    tracing::info!(max_connections = max, "database ready");

    Ok(pool)
}
