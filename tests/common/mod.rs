// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_dashboard::config::Config;
use activity_dashboard::routes::create_router;
use activity_dashboard::services::ActivitySource;
use activity_dashboard::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app serving seeded sample data.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let source = ActivitySource::Sample {
        seed: config.sample_seed,
    };
    create_test_app_with_source(source)
}

/// Create a test app backed by an explicit activity source.
#[allow(dead_code)]
pub fn create_test_app_with_source(source: ActivitySource) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        source,
    });

    (create_router(state.clone()), state)
}

/// Serve `router` on an ephemeral local port, standing in for an upstream
/// API. Returns the base URL.
#[allow(dead_code)]
pub async fn spawn_fake_upstream(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let addr = listener.local_addr().expect("Fake upstream address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    format!("http://{}", addr)
}

/// Send a request and decode the JSON response body.
#[allow(dead_code)]
pub async fn send_json(
    app: axum::Router,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 10 * 1024 * 1024)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// GET `uri` and decode the JSON response body.
#[allow(dead_code)]
pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send_json(app, request).await
}

/// POST a raw body to `uri` and decode the JSON response body.
#[allow(dead_code)]
pub async fn post_json(
    app: axum::Router,
    uri: &str,
    body: impl Into<Body>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send_json(app, request).await
}
