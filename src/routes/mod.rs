//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the drawing endpoints the editor calls, the session endpoints, and
//! a health probe under a single Axum router. CORS is open so a separately
//! hosted editor can call the API; request tracing comes from `TraceLayer`.

pub mod auth;
pub mod drawings;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/Drawings", get(drawings::list_drawings))
        .route("/Drawings/{id}", get(drawings::get_drawing))
        .route("/Drawings/Save", post(drawings::save_drawing))
        .route("/Drawings/DeleteAjax", post(drawings::delete_drawing))
        .route("/Drawings/GenerateImage", post(drawings::generate_image))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/dev/session", post(auth::dev_session))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
