#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use jsonwebtoken::Algorithm;
use naviconomy::auth::TokenService;
use naviconomy::config::DatabaseConfig;
use naviconomy::db::Database;
use naviconomy::middleware::RateLimits;
use naviconomy::router::{NaviconomyState, naviconomy_router};
use serde_json::Value;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret";
pub const PASSWORD: &str = "correct horse battery staple";

/// Router over a throwaway SQLite file. Rate limiting is off unless asked for.
pub struct TestApp {
    pub app: Router,
    pub state: NaviconomyState,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::with_limits(RateLimits::disabled()).await
    }

    pub async fn with_limits(limits: RateLimits) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let cfg = DatabaseConfig {
            url: format!("sqlite:{}", dir.path().join("naviconomy.sqlite").display()),
            max_connections: 4,
            ..DatabaseConfig::default()
        };
        let db = Database::init(&cfg).await.expect("failed to init database");
        let tokens = TokenService::new(SECRET, Algorithm::HS256, Duration::from_secs(30 * 60));
        let state = NaviconomyState::with_tokens(db, tokens, limits);
        Self {
            app: naviconomy_router(state.clone()),
            state,
            _dir: dir,
        }
    }

    pub async fn send_raw(&self, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = self.app.clone().oneshot(req).await.expect("request failed");
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        (status, body.to_vec())
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send_raw(req).await;
        let value = serde_json::from_slice(&body).expect("response body was not json");
        (status, value)
    }

    pub async fn register(&self, username: &str, email: &str) -> (StatusCode, Value) {
        self.send(json_request(
            "POST",
            "/auth/",
            None,
            &serde_json::json!({
                "username": username,
                "email": email,
                "password": PASSWORD,
            }),
        ))
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(form_request(
            "/auth/token",
            &format!("username={username}&password={}", password.replace(' ', "+")),
        ))
        .await
    }

    /// Register `username` and return a bearer token for it.
    pub async fn token_for(&self, username: &str) -> String {
        let (status, _) = self
            .register(username, &format!("{username}@example.com"))
            .await;
        assert_eq!(status, StatusCode::OK, "registration of {username} failed");
        let (status, body) = self.login(username, PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login of {username} failed");
        body["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("failed to build request")
}
