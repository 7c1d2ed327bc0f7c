#![allow(dead_code)]

/// Common test utilities for integration tests
///
/// Drives the real router in-process over a `MemoryStore`:
/// - Router construction with a test configuration
/// - JSON request helpers
/// - Signup + login shortcut returning a bearer token

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::store::MemoryStore;
use tower::Service as _;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Response status plus parsed JSON body (`Value::Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Test context containing the app and a handle on its store
pub struct TestContext {
    pub app: Router,
    pub store: MemoryStore,
    pub config: Config,
}

impl TestContext {
    /// Creates a fresh app over an empty in-memory store
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let config = Config::for_memory_store(TEST_SECRET);
        let app = build_router(AppState::new(store.clone(), config.clone()));

        Self { app, store, config }
    }

    /// Sends a request with an optional JSON body and bearer token
    pub async fn request(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.call(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    pub async fn signup(&mut self, username: &str, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/auth/signup",
            Some(json!({ "username": username, "email": email, "password": password })),
            None,
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Signs a user up, logs in and returns the access token
    pub async fn register_and_login(&mut self, username: &str) -> String {
        let email = format!("{}@example.com", username);
        let signup = self.signup(username, &email, "pw123").await;
        assert_eq!(signup.status, StatusCode::CREATED, "signup body: {}", signup.body);

        let login = self.login(&email, "pw123").await;
        assert_eq!(login.status, StatusCode::OK, "login body: {}", login.body);
        login.body["token"].as_str().unwrap().to_string()
    }

    /// Creates a task and returns its id
    pub async fn create_task(&mut self, token: &str, body: Value) -> String {
        let response = self
            .request(Method::POST, "/api/tasks", Some(body), Some(token))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "create body: {}", response.body);
        response.body["_id"].as_str().unwrap().to_string()
    }

    pub async fn list_tasks(&mut self, token: &str) -> Vec<Value> {
        let response = self.request(Method::GET, "/api/tasks", None, Some(token)).await;
        assert_eq!(response.status, StatusCode::OK);
        response.body.as_array().cloned().unwrap_or_default()
    }
}
