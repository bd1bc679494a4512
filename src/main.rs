mod db;
mod imagegen;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid PORT: {0}")]
    Port(#[from] std::num::ParseIntError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Initialize image client (non-fatal: generation returns 500 if config missing).
    let imagegen: Option<Arc<dyn imagegen::ImageGenerator>> = match imagegen::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "image client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "image client not configured; generation disabled");
            None
        }
    };

    let state = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = db::init_pool(&database_url).await?;
            state::AppState::postgres(pool, imagegen)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; drawings are kept in memory and lost on restart");
            state::AppState::in_memory(imagegen)
        }
    };

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "tinydots listening");
    axum::serve(listener, app).await?;
    Ok(())
}
