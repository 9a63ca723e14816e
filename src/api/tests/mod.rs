use super::*;
use crate::LinkRelay;
use crate::relay::test_helpers::{ScriptedFetcher, ScriptedUploader};
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use std::time::Duration;
use tower::ServiceExt;


/// Helper to create a test LinkRelay instance wrapped in Arc, with default
/// scripted collaborators
async fn create_test_relay() -> (Arc<LinkRelay>, tempfile::TempDir) {
    let (relay, _fetcher, _uploader, temp_dir) =
        crate::relay::test_helpers::create_test_relay(
            ScriptedFetcher::new(),
            ScriptedUploader::new(),
        )
        .await;
    (Arc::new(relay), temp_dir)
}

/// Helper for tests that need to inspect collaborator calls afterwards
async fn create_test_relay_with(
    fetcher: ScriptedFetcher,
    uploader: ScriptedUploader,
) -> (
    Arc<LinkRelay>,
    Arc<ScriptedFetcher>,
    Arc<ScriptedUploader>,
    tempfile::TempDir,
) {
    let (relay, fetcher, uploader, temp_dir) =
        crate::relay::test_helpers::create_test_relay(fetcher, uploader).await;
    (Arc::new(relay), fetcher, uploader, temp_dir)
}

/// Shorthand for building a router from a relay with its own config
fn test_router(relay: &Arc<LinkRelay>) -> axum::Router {
    create_router(relay.clone(), relay.get_config())
}

/// Read a JSON response body
async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let (relay, _temp_dir) = create_test_relay().await;

    // test_config binds port 0, so the OS assigns a free port
    let config = relay.get_config();

    // Spawn the API server
    let api_handle = tokio::spawn({
        let relay = relay.clone();
        let config = config.clone();
        async move { start_api_server(relay, config).await }
    });

    // Give it a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Abort the server task
    api_handle.abort();

    // The test passes if we got here without panicking
}

#[tokio::test]
async fn test_spawn_api_server_method() {
    let (relay, _temp_dir) = create_test_relay().await;

    // Use the spawn_api_server method
    let api_handle = relay.spawn_api_server();

    // Give it a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Abort the server task
    api_handle.abort();

    // Test passes if we got here
}

#[tokio::test]
async fn test_cors_enabled() {
    let (relay, _temp_dir) = create_test_relay().await;

    // Config with CORS enabled (default)
    let mut config = (*relay.get_config()).clone();
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];
    let config = Arc::new(config);

    // Create router with CORS enabled
    let app = create_router(relay, config);

    // Make a request with Origin header
    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    // Check that response has CORS headers
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert!(
        headers.contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let (relay, _temp_dir) = create_test_relay().await;
    let app = test_router(&relay);

    // Make a request to /health
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Check that we got a 200 OK
    assert_eq!(response.status(), StatusCode::OK);

    // Check the response body
    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_authentication_with_api_key() {
    let (relay, _temp_dir) = create_test_relay().await;

    // Config with API key authentication enabled
    let mut config = (*relay.get_config()).clone();
    config.server.api.api_key = Some("test-secret-key".to_string());
    let config = Arc::new(config);

    // Create router with authentication
    let app = create_router(relay, config);

    // Test 1: Request without API key should return 401
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Test 2: Request with valid API key should succeed
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Api-Key", "test-secret-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // Test 3: Request with invalid API key should return 401
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Api-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_authentication_disabled_by_default() {
    let (relay, _temp_dir) = create_test_relay().await;

    // Config with NO API key (default - authentication disabled)
    let mut config = (*relay.get_config()).clone();
    config.server.api.api_key = None;
    let config = Arc::new(config);

    // Create router without authentication
    let app = create_router(relay, config);

    // Request without API key should succeed when authentication is disabled
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_api_key_returns_401_with_structured_error_body() {
    let (relay, _temp_dir) = create_test_relay().await;

    let mut config = (*relay.get_config()).clone();
    config.server.api.api_key = Some("structured-body-key".to_string());
    let config = Arc::new(config);

    let app = create_router(relay, config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/queue/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = response_json(response).await;
    assert_eq!(json["error"]["code"], "unauthorized");
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("X-Api-Key"),
        "401 body should tell the caller which header is missing"
    );
}

#[tokio::test]
async fn test_server_starts_and_responds_to_health() {
    let (relay, _temp_dir) = create_test_relay().await;

    // Bind to a random available port (port 0)
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Spawn the API server on the random port
    let mut config = (*relay.get_config()).clone();
    config.server.api.bind_address = addr;
    config.server.api.api_key = None;
    let config = Arc::new(config);

    let server_relay = relay.clone();
    let server_config = config.clone();
    let server_handle = tokio::spawn(async move {
        let app = create_router(server_relay, server_config);
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Make an HTTP request to /health using reqwest
    let client = reqwest::Client::new();
    let url = format!("http://{}/health", addr);
    let response = client.get(url).send().await.unwrap();

    // Verify response status
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    // Verify response body
    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    // Shutdown the server
    server_handle.abort();
}

#[tokio::test]
async fn test_openapi_json_endpoint() {
    let (relay, _temp_dir) = create_test_relay().await;
    let app = test_router(&relay);

    // Make a request to /openapi.json
    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Check that we got a 200 OK
    assert_eq!(response.status(), StatusCode::OK);

    // Parse as JSON to verify it's valid
    let json = response_json(response).await;

    // Verify it has the required OpenAPI fields
    assert!(json.get("openapi").is_some(), "Should have 'openapi' field");
    assert!(json.get("info").is_some(), "Should have 'info' field");
    assert!(json.get("paths").is_some(), "Should have 'paths' field");

    // Verify OpenAPI version
    let openapi_version = json["openapi"].as_str().unwrap();
    assert!(openapi_version.starts_with("3."), "Should be OpenAPI 3.x");

    // Verify title
    assert_eq!(json["info"]["title"], "link-relay REST API");

    // Every mounted route should be documented
    let paths = json["paths"].as_object().unwrap();
    for path in ["/links", "/queue", "/queue/stats", "/drain", "/drain/cancel", "/target"] {
        assert!(paths.contains_key(path), "spec should document {path}");
    }
}

#[tokio::test]
async fn test_swagger_ui_enabled() {
    let (relay, _temp_dir) = create_test_relay().await;

    // Config with Swagger UI enabled (default)
    let mut config = (*relay.get_config()).clone();
    config.server.api.swagger_ui = true;
    let config = Arc::new(config);

    // Create the router with Swagger UI enabled
    let app = create_router(relay, config);

    // Make a request to /swagger-ui (should redirect or serve HTML)
    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Swagger UI should return 200 OK (serving HTML)
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Swagger UI should be accessible when enabled"
    );

    // Check that the response body contains HTML (Swagger UI page)
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_str = String::from_utf8(body.to_vec()).unwrap();

    assert!(
        body_str.contains("<!DOCTYPE html>") || body_str.contains("<html"),
        "Response should contain HTML"
    );
    assert!(
        body_str.contains("swagger") || body_str.contains("Swagger"),
        "Response should contain Swagger-related content"
    );
}

#[tokio::test]
async fn test_swagger_ui_disabled() {
    let (relay, _temp_dir) = create_test_relay().await;

    // Config with Swagger UI disabled
    let mut config = (*relay.get_config()).clone();
    config.server.api.swagger_ui = false;
    let config = Arc::new(config);

    // Create the router with Swagger UI disabled
    let app = create_router(relay, config);

    // Make a request to /swagger-ui (should return 404)
    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Should return 404 when Swagger UI is disabled
    assert_eq!(
        response.status(),
        StatusCode::NOT_FOUND,
        "Swagger UI should not be accessible when disabled"
    );
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let (relay, _temp_dir) = create_test_relay().await;
    let app = test_router(&relay);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/downloads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
