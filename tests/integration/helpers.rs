//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use tower::ServiceExt;

use gatehouse_api::{AppState, build_router};
use gatehouse_auth::{IdentityProvider, MemorySessionStore, SessionProvider};
use gatehouse_core::config::{AppConfig, SessionConfig};
use gatehouse_core::error::AppError;
use gatehouse_core::traits::ManualClock;
use gatehouse_entity::OAuthToken;

/// Authorization code the stub provider accepts.
pub const GOOD_CODE: &str = "good-code";

/// Identity provider that never leaves the process.
#[derive(Debug)]
pub struct StubIdentity {
    /// Login returned for every accepted code.
    pub login: String,
    /// Number of code exchanges attempted.
    pub exchanges: AtomicUsize,
}

impl StubIdentity {
    pub fn new(login: &str) -> Self {
        Self {
            login: login.to_string(),
            exchanges: AtomicUsize::new(0),
        }
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    fn name(&self) -> &str {
        "github"
    }

    fn authorize_url(&self, state: &str) -> Result<String, AppError> {
        Ok(format!("https://provider.test/authorize?state={state}"))
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthToken, AppError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if code == GOOD_CODE {
            Ok(OAuthToken::bearer("gho_test"))
        } else {
            Err(AppError::external_service("bad_verification_code"))
        }
    }

    async fn fetch_login(&self, _token: &OAuthToken) -> Result<String, AppError> {
        Ok(self.login.clone())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Session store behind the router
    pub store: Arc<MemorySessionStore>,
    /// Clock shared by the store and handlers
    pub clock: Arc<ManualClock>,
    /// Stub identity provider
    pub identity: Arc<StubIdentity>,
}

impl TestApp {
    /// Create a test application with the default session settings.
    pub fn new() -> Self {
        Self::with_max_sessions(SessionConfig::default().max_sessions)
    }

    /// Create a test application holding at most `max_sessions` sessions.
    pub fn with_max_sessions(max_sessions: usize) -> Self {
        let mut config = AppConfig::default();
        config.session.max_sessions = max_sessions;
        config.oauth.client_id = "client".to_string();
        config.oauth.client_secret = "secret".to_string();

        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(MemorySessionStore::with_clock(
            &config.session,
            clock.clone(),
        ));
        let identity = Arc::new(StubIdentity::new("octocat"));

        let state = AppState::new(
            config,
            store.clone() as Arc<dyn SessionProvider>,
            identity.clone() as Arc<dyn IdentityProvider>,
            clock.clone(),
        );

        Self {
            router: build_router(state),
            store,
            clock,
            identity,
        }
    }

    /// Make a GET request, optionally carrying a session cookie value.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method("GET").uri(path);
        if let Some(value) = cookie {
            req = req.header(COOKIE, format!("_session_={value}"));
        }
        let req = req.body(Body::empty()).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body_bytes).into_owned(),
        }
    }

    /// Runs the whole login handshake for a fresh browser and returns its
    /// cookie value.
    pub async fn login(&self) -> String {
        let first = self.get("/", None).await;
        let cookie = first.session_cookie().expect("No session cookie issued");

        let redirect = self.get("/oauth", Some(&cookie)).await;
        let state = redirect.oauth_state().expect("No state in provider redirect");

        let callback = self
            .get(
                &format!("/oauth/callback?state={state}&code={GOOD_CODE}"),
                Some(&cookie),
            )
            .await;
        assert_eq!(callback.status, StatusCode::TEMPORARY_REDIRECT);

        cookie
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Body as text
    pub body: String,
}

impl TestResponse {
    /// Full `Set-Cookie` header for the session cookie, if any.
    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("_session_="))
            .map(String::from)
    }

    /// Session cookie value as the browser would send it back.
    pub fn session_cookie(&self) -> Option<String> {
        let header = self.set_cookie()?;
        let pair = header.split(';').next()?;
        pair.strip_prefix("_session_=").map(String::from)
    }

    /// `Location` header, if any.
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// `state` query value of a redirect to the provider.
    pub fn oauth_state(&self) -> Option<String> {
        let location = self.location()?;
        let query = location.split_once('?')?.1;
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix("state="))
            .map(String::from)
    }
}

/// Decodes the percent-escapes a cookie value may carry for base64 ids.
pub fn decode_cookie(value: &str) -> String {
    value
        .replace("%2B", "+")
        .replace("%2F", "/")
        .replace("%3D", "=")
}
