mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, PASSWORD, STAFF_EMAIL};

fn credentials(email: &str, password: &str) -> String {
    json!({ "email": email, "password": password }).to_string()
}

#[tokio::test]
async fn login_returns_token_accepted_by_gated_routes() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json(Method::POST, "/auth/login", None, &credentials(STAFF_EMAIL, PASSWORD))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["expires_in"], app.config.security.session_timeout_secs);
    assert_eq!(body["data"]["user"]["email"], STAFF_EMAIL);
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = body["data"]["token"].as_str().unwrap();
    let request = axum::http::Request::builder()
        .uri("/api/whoami")
        .header("authorization", format!("Bearer {}", token))
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(app.staff.id));
}

#[tokio::test]
async fn email_lookup_ignores_case() {
    let app = TestApp::new().await;

    let (status, _) = app
        .json(Method::POST, "/auth/login", None, &credentials("Teacher@College.com", PASSWORD))
        .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new().await;

    let (status, wrong_password) = app
        .json(Method::POST, "/auth/login", None, &credentials(STAFF_EMAIL, "nope"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = app
        .json(Method::POST, "/auth/login", None, &credentials("ghost@college.com", PASSWORD))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["message"], "Invalid email or password");
}

#[tokio::test]
async fn malformed_login_body_is_bad_request() {
    let app = TestApp::new().await;

    let (status, body) = app.json(Method::POST, "/auth/login", None, "{oops").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "error", "message": "Invalid JSON data"}));
}

#[tokio::test]
async fn login_only_accepts_post() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::GET, "/auth/login", None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "Method GET not allowed");
}

#[tokio::test]
async fn repeated_failures_lock_the_email() {
    let mut config = common::test_config();
    config.security.max_login_attempts = 2;
    let app = TestApp::with_config(config).await;

    for _ in 0..2 {
        let (status, _) = app
            .json(Method::POST, "/auth/login", None, &credentials(STAFF_EMAIL, "nope"))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // Even the right password is refused while locked
    let (status, body) = app
        .json(Method::POST, "/auth/login", None, &credentials(STAFF_EMAIL, PASSWORD))
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["message"], "Too many login attempts");

    // Other accounts are unaffected
    let (status, _) = app
        .json(Method::POST, "/auth/login", None, &credentials(common::ADMIN_EMAIL, PASSWORD))
        .await;
    assert_eq!(status, StatusCode::OK);
}
