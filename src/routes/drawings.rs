//! Drawing routes: owner-scoped list/load/save/delete and the image proxy.
//!
//! Paths keep the controller-style names (`/Drawings/Save`,
//! `/Drawings/DeleteAjax`) that existing editor clients already call.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::imagegen::ImageGenError;
use crate::routes::auth::AuthUser;
use crate::services::drawing::{self, Drawing, DrawingError, SaveDrawing};
use crate::state::AppState;

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingResponse {
    pub id: i64,
    pub pixel_data: String,
    /// Side length decoded from `pixel_data`; `null` when it is not a square matrix.
    pub grid_size: Option<usize>,
    pub created_at: DateTime<Utc>,
}

impl From<Drawing> for DrawingResponse {
    fn from(d: Drawing) -> Self {
        let grid_size = canvas::matrix::grid_size(&d.pixel_data);
        Self { id: d.id, pixel_data: d.pixel_data, grid_size, created_at: d.created_at }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBody {
    pub id: Option<i64>,
    pub pixel_data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: Option<String>,
}

fn bad_request(rejection: &JsonRejection) -> Response {
    (StatusCode::BAD_REQUEST, rejection.body_text()).into_response()
}

pub(crate) fn drawing_error_to_response(err: DrawingError) -> Response {
    match err {
        DrawingError::MissingPixelData => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        DrawingError::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
        DrawingError::Database(e) => {
            tracing::error!(error = %e, "drawing query failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub(crate) fn imagegen_error_to_response(err: ImageGenError) -> Response {
    match err {
        ImageGenError::ApiResponse { status, body } => {
            tracing::warn!(status, "image provider returned an error");
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, body).into_response()
        }
        ImageGenError::ApiRequest(e) => {
            tracing::error!(error = %e, "image provider unreachable");
            StatusCode::BAD_GATEWAY.into_response()
        }
        other => {
            tracing::error!(error = %other, "image generation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /Drawings`: the caller's drawings, newest first.
pub async fn list_drawings(State(state): State<AppState>, auth: AuthUser) -> Response {
    match state.drawings.list(&auth.user.id).await {
        Ok(rows) => Json(
            rows.into_iter()
                .map(DrawingResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => drawing_error_to_response(e),
    }
}

/// `GET /Drawings/{id}`: one owned drawing.
pub async fn get_drawing(State(state): State<AppState>, auth: AuthUser, Path(id): Path<i64>) -> Response {
    match drawing::load_drawing(state.drawings.as_ref(), &auth.user.id, id).await {
        Ok(d) => Json(DrawingResponse::from(d)).into_response(),
        Err(e) => drawing_error_to_response(e),
    }
}

/// `POST /Drawings/Save`: create when `id` is absent, otherwise update the owned row.
pub async fn save_drawing(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<SaveBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(&rejection),
    };

    let req = SaveDrawing { id: body.id, pixel_data: body.pixel_data };
    match drawing::save_drawing(state.drawings.as_ref(), &auth.user.id, req).await {
        Ok(id) => Json(serde_json::json!({ "id": id })).into_response(),
        Err(e) => drawing_error_to_response(e),
    }
}

/// `POST /Drawings/DeleteAjax`: body is the bare id, e.g. `7`.
pub async fn delete_drawing(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<i64>, JsonRejection>,
) -> Response {
    let Json(id) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(&rejection),
    };

    match drawing::delete_drawing(state.drawings.as_ref(), &auth.user.id, id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => drawing_error_to_response(e),
    }
}

/// `POST /Drawings/GenerateImage`: proxy a prompt to the image provider.
///
/// Open to unauthenticated callers. Any `size` sent by the client is ignored;
/// the server's configured size is always used.
pub async fn generate_image(State(state): State<AppState>, body: Result<Json<GenerateBody>, JsonRejection>) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(&rejection),
    };
    let Some(prompt) = body.prompt.filter(|p| !p.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, "prompt is required").into_response();
    };
    let Some(imagegen) = &state.imagegen else {
        tracing::error!("image generation requested but not configured");
        return (StatusCode::INTERNAL_SERVER_ERROR, "image generation is not configured").into_response();
    };

    match imagegen.generate(&prompt).await {
        Ok(b64) => Json(serde_json::json!({ "imageBase64": b64 })).into_response(),
        Err(e) => imagegen_error_to_response(e),
    }
}

#[cfg(test)]
#[path = "drawings_test.rs"]
mod tests;
