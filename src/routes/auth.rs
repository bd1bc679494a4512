//! Auth routes: session lookup, logout, and the development session bypass.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;
use uuid::Uuid;

use crate::services::session::SessionUser;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn cookie_secure() -> bool {
    env_bool("COOKIE_SECURE").unwrap_or(false)
}

fn dev_auth_bypass_enabled() -> bool {
    env_bool("DEV_AUTH_BYPASS").unwrap_or(false)
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .build()
}

/// Pull a bearer token out of an `Authorization` header value.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie or a bearer token.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = match jar.get(COOKIE_NAME).map(Cookie::value) {
            Some(token) if !token.is_empty() => token.to_owned(),
            _ => parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(bearer_token)
                .map(str::to_owned)
                .ok_or(StatusCode::UNAUTHORIZED)?,
        };

        let app_state = AppState::from_ref(state);
        let user = app_state
            .sessions
            .validate_session(&token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, token })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/auth/me`: return current user.
pub async fn me(auth: AuthUser) -> Json<SessionUser> {
    Json(auth.user)
}

/// `POST /api/auth/logout`: delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = state.sessions.delete_session(&auth.token).await {
        tracing::warn!(error = %e, "session delete failed");
    }

    let mut cookie = session_cookie(String::new());
    cookie.set_max_age(Duration::ZERO);

    let jar = CookieJar::new().add(cookie);
    (jar, StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevSessionBody {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

/// `POST /api/dev/session`: issue a session without the identity provider.
///
/// Enabled only when `DEV_AUTH_BYPASS=true`. A missing `userId` gets a fresh
/// random id.
pub async fn dev_session(
    State(state): State<AppState>,
    Json(body): Json<DevSessionBody>,
) -> Result<impl IntoResponse, StatusCode> {
    if !dev_auth_bypass_enabled() {
        return Err(StatusCode::NOT_FOUND);
    }

    let user_id = body
        .user_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let internal = |e: crate::services::session::SessionError| {
        tracing::error!(error = %e, "dev session failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    state
        .sessions
        .upsert_user(&user_id, body.email.as_deref())
        .await
        .map_err(internal)?;
    let token = state
        .sessions
        .create_session(&user_id)
        .await
        .map_err(internal)?;

    tracing::info!(%user_id, "dev session issued");
    let jar = CookieJar::new().add(session_cookie(token.clone()));
    Ok((jar, Json(serde_json::json!({ "token": token, "userId": user_id }))))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
