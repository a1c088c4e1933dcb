//! Backend service tests.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hello_cluster::{AppConfig, Greeting, HttpServer};
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_returns_configured_message_and_host_name() {
    for message in ["Hello world!", "Bonjour le monde", "ünïcödé ✓"] {
        let backend = common::spawn_backend(message, "node-1").await;

        let res = common::client().get(backend.url("/")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let greeting: Greeting = res.json().await.unwrap();
        assert_eq!(greeting, Greeting::new(message, "node-1"));
    }
}

#[tokio::test]
async fn test_default_message() {
    let backend = common::spawn_server(HttpServer::backend(AppConfig::default(), "pod-a")).await;

    let body = common::client().get(backend.url("/")).send().await.unwrap().text().await.unwrap();
    assert_eq!(body, r#"{"message":"Hello world!","source":"pod-a"}"#);
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let backend = common::spawn_backend("Hi", "node-1").await;
    let client = common::client();

    let mut bodies = Vec::new();
    for _ in 0..5 {
        bodies.push(client.get(backend.url("/")).send().await.unwrap().text().await.unwrap());
    }
    assert!(bodies.windows(2).all(|w| w[0] == w[1]), "{bodies:?}");
}

#[tokio::test]
async fn test_empty_message_is_omitted() {
    let backend = common::spawn_backend("", "node-1").await;

    let body = common::client().get(backend.url("/")).send().await.unwrap().text().await.unwrap();
    assert_eq!(body, r#"{"source":"node-1"}"#);
}

#[tokio::test]
async fn test_message_reload_keeps_host_name() {
    let backend = common::spawn_backend("before", "node-1").await;
    let client = common::client();

    let mut config = AppConfig::default();
    config.backend.message = "after".to_string();
    backend.updates.send(config).unwrap();

    let mut greeting = Greeting::default();
    for _ in 0..50 {
        greeting = client.get(backend.url("/")).send().await.unwrap().json().await.unwrap();
        if greeting.message() == "after" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(greeting, Greeting::new("after", "node-1"));
}

#[tokio::test]
async fn test_probes() {
    let backend = common::spawn_backend("Hi", "node-1").await;
    let client = common::client();

    for probe in ["/healthz", "/readyz"] {
        let res = client.get(backend.url(probe)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.text().await.unwrap(), "ok");
    }
}

#[tokio::test]
async fn test_request_id_is_generated_and_echoed() {
    let server = HttpServer::backend(AppConfig::default(), "node-1");

    let res = server
        .router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let res = server
        .router()
        .oneshot(
            Request::builder()
                .uri("/")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "abc-123");

    let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
    let greeting: Greeting = serde_json::from_slice(&body).unwrap();
    assert_eq!(greeting.source(), "node-1");
}

#[tokio::test]
async fn test_unknown_route() {
    let backend = common::spawn_backend("Hi", "node-1").await;
    let res = common::client().get(backend.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
