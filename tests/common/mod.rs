//! Shared test utilities for craftwatch integration tests.
//!
//! Provides a wiremock-backed stand-in for the event backend and helpers
//! for building clients against it.

#![allow(dead_code)]

use craftwatch::client::BackendClient;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Nothing listens here, so every request fails at the transport layer.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Client with a short timeout against `base`.
pub fn client_for(base: &str) -> BackendClient {
    BackendClient::new(base, Duration::from_secs(2)).unwrap()
}

/// Mount a GET route answering 200 with a JSON body.
pub async fn mock_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a GET route answering 200 with a raw text body.
pub async fn mock_text(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mount a GET route answering with `status` and an empty body.
pub async fn mock_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Health endpoint body as the backend reports it.
pub fn health_body(healthy: bool, error: Option<&str>) -> Value {
    match error {
        Some(error) => json!({ "healthy": healthy, "error": error }),
        None => json!({ "healthy": healthy }),
    }
}

/// Log directory index linking `files`, as a static file server lists it.
pub fn directory_index(files: &[&str]) -> String {
    let items: String = files
        .iter()
        .map(|f| format!("<li><a href=\"{f}\">{f}</a></li>\n"))
        .collect();
    format!("<html><body><h1>Directory listing for /logs/</h1><ul>\n{items}</ul></body></html>")
}

/// Backend where every endpoint answers successfully.
pub async fn start_backend() -> MockServer {
    let server = MockServer::start().await;

    mock_json(
        &server,
        "/api/calendar",
        json!([
            {"name": "Build Contest", "start": "2024-06-01T10:00:00", "end": "2024-06-01T12:00:00"},
            {"name": "PvP Night", "start": "2099-01-01T20:00:00Z", "end": "2099-01-01T23:00:00Z"}
        ]),
    )
    .await;
    mock_json(&server, "/api/event_files", json!(["build.json", "pvp.json"])).await;
    mock_json(
        &server,
        "/api/logs",
        json!([
            {"timestamp": "2024-06-01T10:00:00", "log_level": "INFO", "message": "Event started"}
        ]),
    )
    .await;
    mock_json(&server, "/api/event_handler_status", json!({"status": "Running"})).await;
    mock_json(&server, "/api/health/minecraft", health_body(true, None)).await;
    mock_json(&server, "/api/health/rcon", health_body(true, None)).await;
    mock_text(&server, "/api/event_json_content/build.json", r#"{"commands":["say hi"]}"#).await;
    mock_text(&server, "/api/log_content/server.log", "[10:00] Server started\n").await;
    mock_text(
        &server,
        "/logs/",
        &directory_index(&["event_logs.txt", "Build-Contest-06-01-2024.json"]),
    )
    .await;
    mock_json(
        &server,
        "/logs/Build-Contest-06-01-2024.json",
        json!({
            "Event": "Build Contest",
            "Date": "2024-06-01 12:00:00",
            "Leaders": ["Steve"],
            "FinalScore": 42
        }),
    )
    .await;

    server
}
