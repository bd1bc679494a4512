use super::*;

// =============================================================================
// env_bool: uses unique env var names to avoid races with parallel tests.
// =============================================================================

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "yes", "on", "TRUE", "On"].iter().enumerate() {
        let key = format!("__TEST_TD_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "no", "off"].iter().enumerate() {
        let key = format!("__TEST_TD_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_invalid_or_unset_is_none() {
    let key = "__TEST_TD_EB_INVALID_4411__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
    assert_eq!(env_bool(key), None);
}

#[test]
fn env_bool_whitespace_trimmed() {
    let key = "__TEST_TD_EB_WS_4412__";
    unsafe { std::env::set_var(key, "  yes ") };
    assert_eq!(env_bool(key), Some(true));
    unsafe { std::env::remove_var(key) };
}

// =============================================================================
// bearer_token
// =============================================================================

#[test]
fn bearer_token_accepts_any_scheme_case() {
    assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
    assert_eq!(bearer_token("bearer abc123"), Some("abc123"));
    assert_eq!(bearer_token("  BEARER   abc123  "), Some("abc123"));
}

#[test]
fn bearer_token_rejects_other_schemes_and_blanks() {
    assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
    assert_eq!(bearer_token("Bearer"), None);
    assert_eq!(bearer_token("Bearer    "), None);
    assert_eq!(bearer_token(""), None);
}

// =============================================================================
// Session routes
// =============================================================================

mod session_routes {
    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::routes;
    use crate::routes::auth::COOKIE_NAME;
    use crate::state::test_helpers::{seed_session, test_app_state};

    fn with_cookie(method: Method, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(COOKIE, format!("{COOKIE_NAME}={token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn me_returns_session_user() {
        let state = test_app_state();
        let token = seed_session(&state, "alice").await;

        let resp = routes::app(state)
            .oneshot(with_cookie(Method::GET, "/api/auth/me", &token))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let user: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(user["id"], "alice");
    }

    #[tokio::test]
    async fn me_without_session_is_unauthorized() {
        let resp = routes::app(test_app_state())
            .oneshot(Request::builder().uri("/api/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_clears_cookie_and_invalidates_token() {
        let state = test_app_state();
        let token = seed_session(&state, "alice").await;

        let resp = routes::app(state.clone())
            .oneshot(with_cookie(Method::POST, "/api/auth/logout", &token))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let set_cookie = resp.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with(&format!("{COOKIE_NAME}=")));
        assert!(set_cookie.contains("Max-Age=0"));

        assert!(state.sessions.validate_session(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn dev_session_is_gated_by_env() {
        let dev_request = || {
            Request::builder()
                .method(Method::POST)
                .uri("/api/dev/session")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"userId":"dev-user"}"#))
                .unwrap()
        };
        let state = test_app_state();

        unsafe { std::env::remove_var("DEV_AUTH_BYPASS") };
        let resp = routes::app(state.clone()).oneshot(dev_request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        unsafe { std::env::set_var("DEV_AUTH_BYPASS", "true") };
        let resp = routes::app(state.clone()).oneshot(dev_request()).await.unwrap();
        unsafe { std::env::remove_var("DEV_AUTH_BYPASS") };

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(SET_COOKIE).is_some());
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["userId"], "dev-user");

        let token = body["token"].as_str().unwrap();
        let user = state.sessions.validate_session(token).await.unwrap().unwrap();
        assert_eq!(user.id, "dev-user");
    }
}
