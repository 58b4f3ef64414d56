#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use brainbox_api::config::AppConfig;
use brainbox_api::database::MemoryStore;
use brainbox_api::{app, AppState};

/// In-process server backed by a fresh memory store.
pub struct TestApp {
    router: Router,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        // Development defaults; nothing read from the real environment
        let config = AppConfig::from_lookup(|_| None);
        let router = app(AppState::new(Arc::new(store.clone())), &config);
        Self { router, store }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// POST and return the created document's `_id`.
    pub async fn create(&self, uri: &str, body: Value) -> String {
        let (status, res) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", res);
        res["data"]["_id"]
            .as_str()
            .unwrap_or_else(|| panic!("missing _id in {}", res))
            .to_string()
    }
}

/// Assert the error envelope and return its code.
pub fn error_code(body: &Value) -> &str {
    assert_eq!(body["success"], Value::Bool(false), "expected error envelope: {}", body);
    body["code"].as_str().unwrap_or_default()
}
