//! Authentication API integration tests
//!
//! Endpoint-level tests for signup, login and logout, including the
//! session cookie lifecycle.

mod common;

use common::{cookie_header, cookie_name, session_cookie_from, TestApp};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_signup_success() {
    let app = TestApp::new();

    let response = app.signup("alice1", "secret1", "a@example.com").await;
    assert_eq!(response.status_code().as_u16(), 201);

    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "alice1");
    assert_eq!(body["email"], "a@example.com");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_rejects_short_username() {
    let app = TestApp::new();
    let response = app.signup("bob", "secret1", "b@example.com").await;
    assert_eq!(response.status_code().as_u16(), 400);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let app = TestApp::new();
    let response = app.signup("alice1", "four", "a@example.com").await;
    assert_eq!(response.status_code().as_u16(), 400);
}

#[tokio::test]
async fn test_signup_rejects_invalid_email() {
    let app = TestApp::new();
    let response = app.signup("alice1", "secret1", "not-an-email").await;
    assert_eq!(response.status_code().as_u16(), 400);
}

#[tokio::test]
async fn test_signup_duplicate_username_is_store_failure() {
    let app = TestApp::new();

    let first = app.signup("alice1", "secret1", "a@example.com").await;
    assert_eq!(first.status_code().as_u16(), 201);

    let second = app.signup("alice1", "other55", "b@example.com").await;
    assert_eq!(second.status_code().as_u16(), 500);

    // Nothing about the collision leaks to the client
    let body: serde_json::Value = second.json();
    assert_eq!(body["error"], "internal server error");
}

#[tokio::test]
async fn test_concurrent_duplicate_signups_one_winner() {
    let app = TestApp::new();

    let (a, b) = tokio::join!(
        app.signup("alice1", "secret1", "a@example.com"),
        app.signup("alice1", "secret2", "b@example.com"),
    );

    let mut statuses = [a.status_code().as_u16(), b.status_code().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [201, 500]);
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = TestApp::new();
    app.signup("alice1", "secret1", "a@example.com").await;

    let response = app.login("alice1", "secret1").await;
    assert_eq!(response.status_code().as_u16(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "alice1");

    let cookie = session_cookie_from(&response).expect("session cookie should be set");
    assert!(cookie.starts_with("gatherly_session="));
}

#[tokio::test]
async fn test_login_unknown_user_sets_no_cookie() {
    let app = TestApp::new();

    let response = app.login("ghost", "secret1").await;
    assert_eq!(response.status_code().as_u16(), 401);
    assert!(session_cookie_from(&response).is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.signup("alice1", "secret1", "a@example.com").await;

    let response = app.login("alice1", "wrong55").await;
    assert_eq!(response.status_code().as_u16(), 401);
    assert!(session_cookie_from(&response).is_none());
}

#[tokio::test]
async fn test_rejections_do_not_reveal_which_part_failed() {
    let app = TestApp::new();
    app.signup("alice1", "secret1", "a@example.com").await;

    let unknown: serde_json::Value = app.login("ghost", "secret1").await.json();
    let wrong: serde_json::Value = app.login("alice1", "wrong55").await.json();
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let app = TestApp::new();
    let cookie = app.signup_and_login("alice1", "secret1", "a@example.com").await;

    // Session works before logout
    let response = app
        .server
        .get("/events")
        .add_header(cookie_name(), cookie_header(&cookie))
        .await;
    assert_eq!(response.status_code().as_u16(), 200);

    let response = app
        .server
        .get("/logout")
        .add_header(cookie_name(), cookie_header(&cookie))
        .await;
    assert_eq!(response.status_code().as_u16(), 200);

    // The same token now resolves to anonymous
    let response = app
        .server
        .get("/events")
        .add_header(cookie_name(), cookie_header(&cookie))
        .await;
    assert_eq!(response.status_code().as_u16(), 401);
}

#[tokio::test]
async fn test_logout_without_session_is_noop() {
    let app = TestApp::new();
    let response = app.server.get("/logout").await;
    assert_eq!(response.status_code().as_u16(), 200);
}

#[tokio::test]
async fn test_form_pages_are_public() {
    let app = TestApp::new();

    let login_page = app.server.get("/login").await;
    assert_eq!(login_page.status_code().as_u16(), 200);
    assert!(login_page.text().contains("<form"));

    let signup_page = app.server.get("/signup").await;
    assert_eq!(signup_page.status_code().as_u16(), 200);
    assert!(signup_page.text().contains("<form"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new();
    let response = app.server.get("/nope").await;
    assert_eq!(response.status_code().as_u16(), 404);
}
