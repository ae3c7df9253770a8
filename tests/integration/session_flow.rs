//! Integration tests for the session cookie lifecycle.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;

use gatehouse_auth::SessionProvider;

use helpers::{TestApp, decode_cookie};

#[tokio::test]
async fn test_first_visit_issues_session_cookie() {
    let app = TestApp::new();

    let response = app.get("/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"<a href="/oauth">GitHub</a>"#));

    let set_cookie = response.set_cookie().expect("No Set-Cookie header");
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age=604800"));
    assert!(set_cookie.contains("Expires="));
    assert!(!set_cookie.contains("Secure"));

    let id = decode_cookie(&response.session_cookie().unwrap());
    assert_eq!(id.len(), 32);
    assert!(app.store.get(&id).await.unwrap().is_some());
    assert_eq!(app.store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_returning_browser_keeps_its_session() {
    let app = TestApp::new();
    let cookie = app.get("/", None).await.session_cookie().unwrap();

    let again = app.get("/", Some(&cookie)).await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.session_cookie().as_deref(), Some(cookie.as_str()));
    assert_eq!(app.store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_lookup_renews_cookie_lifetime() {
    let app = TestApp::new();
    let cookie = app.get("/", None).await.session_cookie().unwrap();

    app.clock.advance(Duration::hours(100));
    let renewed = app.get("/", Some(&cookie)).await;
    assert!(renewed.set_cookie().unwrap().contains("Max-Age=604800"));

    app.clock.advance(Duration::hours(100));
    let still_there = app.get("/", Some(&cookie)).await;
    assert_eq!(still_there.session_cookie().as_deref(), Some(cookie.as_str()));
}

#[tokio::test]
async fn test_unknown_cookie_gets_fresh_session() {
    let app = TestApp::new();

    for bogus in ["nonsense", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", ""] {
        let response = app.get("/", Some(bogus)).await;
        assert_eq!(response.status, StatusCode::OK);
        let issued = response.session_cookie().unwrap();
        assert_ne!(issued, bogus);
    }
    assert_eq!(app.store.len().await.unwrap(), 3);
}

#[tokio::test]
async fn test_expired_session_is_replaced() {
    let app = TestApp::new();
    let cookie = app.get("/", None).await.session_cookie().unwrap();

    app.clock.advance(Duration::hours(169));
    let response = app.get("/", Some(&cookie)).await;
    let replacement = response.session_cookie().unwrap();

    assert_ne!(replacement, cookie);
    assert!(
        app.store
            .get(&decode_cookie(&cookie))
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(app.store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_full_store_rejects_new_browsers_only() {
    let app = TestApp::with_max_sessions(2);
    let first = app.get("/", None).await.session_cookie().unwrap();
    app.get("/", None).await.session_cookie().unwrap();

    let turned_away = app.get("/", None).await;
    assert_eq!(turned_away.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(turned_away.set_cookie().is_none());

    let known = app.get("/", Some(&first)).await;
    assert_eq!(known.status, StatusCode::OK);
    assert_eq!(app.store.len().await.unwrap(), 2);
}

#[tokio::test]
async fn test_full_store_recovers_after_expiry() {
    let app = TestApp::with_max_sessions(1);
    app.get("/", None).await.session_cookie().unwrap();
    assert_eq!(
        app.get("/", None).await.status,
        StatusCode::UNPROCESSABLE_ENTITY
    );

    app.clock.advance(Duration::hours(169));
    let response = app.get("/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.session_cookie().is_some());
}

#[tokio::test]
async fn test_health_does_not_create_sessions() {
    let app = TestApp::new();
    app.get("/", None).await;

    let response = app.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookie().is_none());

    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["live_sessions"], 1);
    assert_eq!(app.store.len().await.unwrap(), 1);
}
