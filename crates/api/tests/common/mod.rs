//! Shared helpers for HTTP integration tests.
//!
//! Requests go straight to the router through `tower::ServiceExt::oneshot`,
//! backed by the in-memory store and a manual clock.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use gacha_api::config::ServerConfig;
use gacha_api::router::build_app_router;
use gacha_api::state::AppState;
use gacha_core::clock::ManualClock;
use gacha_core::store::memory::MemoryStore;
use gacha_engine::{GachaEngine, GameTuning};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        seed_catalog: false,
    }
}

pub struct TestApp {
    pub router: Router,
    pub engine: Arc<GachaEngine>,
    pub backend: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app() -> TestApp {
    let (backend, stores) = MemoryStore::stores();
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let engine = Arc::new(GachaEngine::with_clock(
        stores,
        GameTuning::default(),
        clock.clone(),
    ));

    let config = test_config();
    let state = AppState {
        engine: Arc::clone(&engine),
        pool: None,
    };

    TestApp {
        router: build_app_router(state, &config),
        engine,
        backend,
        clock,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Response<Body> {
        send(&self.router, Method::GET, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        send(&self.router, Method::DELETE, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        send(&self.router, Method::POST, uri, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> Response<Body> {
        send(&self.router, Method::PUT, uri, Some(body)).await
    }

    /// Register a player through the API and return its id.
    pub async fn register(&self, username: &str) -> String {
        let response = self
            .post_json(
                "/api/v1/players",
                serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "Secret#123",
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        json["data"]["player_id"].as_str().unwrap().to_string()
    }

    /// Add a character to the catalog through the API and return its id.
    pub async fn add_character(&self, name: &str, rarity: &str) -> String {
        let response = self
            .post_json(
                "/api/v1/catalog",
                serde_json::json!({
                    "name": name,
                    "rarity": rarity,
                    "image": format!("https://img.example/{name}.png"),
                    "description": format!("{name} description"),
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        json["data"]["id"].as_str().unwrap().to_string()
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    router.clone().oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
