//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use glitchroom_core::clock::Clock;
use glitchroom_test_support::ManualClock;
use http_body_util::BodyExt;
use tower::ServiceExt;

use glitchroom_api::state::AppState;

/// A running test application and the clock that drives it.
pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
    pub state: AppState,
}

impl TestApp {
    /// Moves the application clock forward.
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}

/// Build the full app with the bundled script, the real challenges and a
/// manual clock. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    let clock = Arc::new(ManualClock::default());
    let shared: Arc<dyn Clock> = clock.clone();
    let script = glitchroom_content::default_script().unwrap();
    let state = AppState::new(shared, Arc::new(script), glitchroom_challenges::build);
    TestApp {
        router: glitchroom_api::app(state.clone()),
        clock,
        state,
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &TestApp,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: &TestApp, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &TestApp, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Creates a game and returns its id.
pub async fn create_game(app: &TestApp) -> String {
    let (status, json) = post_empty(app, "/api/v1/games").await;
    assert_eq!(status, StatusCode::CREATED);
    json["game_id"].as_str().unwrap().to_owned()
}
