//! In-process test server.
//!
//! `TestApp` owns one user store and one signing key. `at(now)` gives a view
//! of the same app with the clock frozen at a different instant, so a token
//! issued at t0 can be replayed at t0 + 1h, t0 + 25h, ...
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use catalog_api::app;
use catalog_api::config::{AppEnv, Config, MIN_BCRYPT_COST};
use catalog_api::repos::{InMemoryUserRepo, UserRepo};
use catalog_api::services::auth::{PasswordHasher, TokenService};
use catalog_api::services::clock::FixedClock;
use catalog_api::state::AppState;
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Whole-second instant used as "now" unless a test moves the clock.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

pub fn test_config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        app_env: AppEnv::Development,
        database_url: None,
        cors_allowed_origins: Vec::new(),
        bcrypt_cost: MIN_BCRYPT_COST,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
pub struct TestApp {
    pub state: AppState,
    extra: Router<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_routes(Router::new())
    }

    /// The API plus `extra` routes, all behind the same pipeline.
    pub fn with_routes(extra: Router<AppState>) -> Self {
        let users: Arc<dyn UserRepo> = Arc::new(InMemoryUserRepo::new());
        let tokens = Arc::new(TokenService::generate().unwrap());
        let state = AppState::new(
            users,
            tokens,
            PasswordHasher::new(MIN_BCRYPT_COST),
            Arc::new(FixedClock(t0())),
        );
        Self { state, extra }
    }

    /// Same store and key, clock frozen at `now`.
    pub fn at(&self, now: DateTime<Utc>) -> Self {
        let mut state = self.state.clone();
        state.clock = Arc::new(FixedClock(now));
        Self {
            state,
            extra: self.extra.clone(),
        }
    }

    pub fn router(&self) -> Router {
        let routes = catalog_api::api::routes().merge(self.extra.clone());
        app::compose(routes, self.state.clone(), &test_config())
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, authorization: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: &Value,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }
        self.send(req.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/api/users",
            &json!({ "name": name, "age": 30, "email": email, "password": password }),
            None,
        )
        .await
    }

    pub async fn login(&self, login: &str, password: &str) -> TestResponse {
        self.post_json(
            "/api/auth/login",
            &json!({ "login": login, "password": password }),
            None,
        )
        .await
    }

    /// Register `name` and return a bearer token issued at the app's clock.
    pub async fn token_for(&self, name: &str) -> String {
        let email = format!("{name}@example.com");
        let reg = self.register(name, &email, "correct horse").await;
        assert_eq!(reg.status, StatusCode::CREATED, "{:?}", reg.body);

        let res = self.login(&email, "correct horse").await;
        assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
        res.body["token"].as_str().unwrap().to_string()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
