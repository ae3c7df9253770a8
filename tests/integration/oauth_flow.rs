//! Integration tests for the OAuth login handshake.

mod helpers;

use axum::http::StatusCode;

use gatehouse_auth::{SessionProvider, oauth_state};

use helpers::{GOOD_CODE, TestApp, decode_cookie};

#[tokio::test]
async fn test_login_redirects_to_provider_with_derived_state() {
    let app = TestApp::new();
    let cookie = app.get("/", None).await.session_cookie().unwrap();

    let response = app.get("/oauth", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert!(
        response
            .location()
            .unwrap()
            .starts_with("https://provider.test/authorize")
    );

    let state = response.oauth_state().unwrap();
    let id = decode_cookie(&cookie);
    assert_eq!(state, oauth_state(&id));
    assert!(!response.location().unwrap().contains(&id));
}

#[tokio::test]
async fn test_successful_handshake_greets_user() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let page = app.get("/", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Hello, <b>octocat</b>!"));

    let session = app
        .store
        .get(&decode_cookie(&cookie))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.user, "octocat");
    assert!(session.credential.is_some());
}

#[tokio::test]
async fn test_authorized_session_skips_provider() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app.get("/oauth", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_state_mismatch_is_ignored() {
    let app = TestApp::new();
    let cookie = app.get("/", None).await.session_cookie().unwrap();

    let response = app
        .get(
            &format!("/oauth/callback?state=forged&code={GOOD_CODE}"),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/"));
    assert_eq!(app.identity.exchange_count(), 0);

    let page = app.get("/", Some(&cookie)).await;
    assert!(!page.body.contains("Hello"));
}

#[tokio::test]
async fn test_state_from_another_browser_is_ignored() {
    let app = TestApp::new();
    let alice = app.get("/", None).await.session_cookie().unwrap();
    let mallory = app.get("/", None).await.session_cookie().unwrap();

    let alice_state = app.get("/oauth", Some(&alice)).await.oauth_state().unwrap();
    app.get(
        &format!("/oauth/callback?state={alice_state}&code={GOOD_CODE}"),
        Some(&mallory),
    )
    .await;

    let session = app
        .store
        .get(&decode_cookie(&mallory))
        .await
        .unwrap()
        .unwrap();
    assert!(session.user.is_empty());
}

#[tokio::test]
async fn test_failed_exchange_leaves_session_anonymous() {
    let app = TestApp::new();
    let cookie = app.get("/", None).await.session_cookie().unwrap();
    let state = app.get("/oauth", Some(&cookie)).await.oauth_state().unwrap();

    let response = app
        .get(
            &format!("/oauth/callback?state={state}&code=expired"),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/"));
    assert_eq!(app.identity.exchange_count(), 1);

    let page = app.get("/", Some(&cookie)).await;
    assert!(page.body.contains(r#"<a href="/oauth">GitHub</a>"#));
}

#[tokio::test]
async fn test_callback_without_session_is_unprocessable() {
    let app = TestApp::with_max_sessions(1);
    app.get("/", None).await;

    let response = app
        .get(&format!("/oauth/callback?state=x&code={GOOD_CODE}"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.identity.exchange_count(), 0);
}
