//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hello_cluster::{AppConfig, HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Bind an ephemeral loopback port.
pub async fn bind_local() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// An address nothing listens on.
pub fn refused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Start a mock backend that always answers 200 with a fixed JSON body.
pub async fn start_mock_backend(body: &'static str) -> SocketAddr {
    start_programmable_backend(move || async move { (200, body.to_string()) }).await
}

/// Start a programmable mock backend; `f` decides status and body per request.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let (listener, addr) = bind_local().await;
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;

                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// A server running in the background; shut down on drop.
pub struct RunningService {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<AppConfig>,
    shutdown: Shutdown,
}

impl RunningService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn spawn_server(server: HttpServer) -> RunningService {
    let (listener, addr) = bind_local().await;
    let (updates, rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx, server_shutdown).await;
    });

    RunningService {
        addr,
        updates,
        shutdown,
    }
}

pub async fn spawn_backend(message: &str, host_name: &str) -> RunningService {
    let mut config = AppConfig::default();
    config.backend.message = message.to_string();
    spawn_server(HttpServer::backend(config, host_name)).await
}

/// Frontend config resolving `http://backend/` to `instances`.
pub fn frontend_config(instances: &[SocketAddr]) -> AppConfig {
    let mut config = AppConfig::default();
    config.frontend.backend_address = "http://backend/".to_string();
    config.discovery.services.insert(
        "backend".to_string(),
        instances.iter().map(ToString::to_string).collect(),
    );
    config.timeouts.connect_ms = 500;
    config.timeouts.request_ms = 1_000;
    config
}

pub async fn spawn_frontend(config: AppConfig) -> RunningService {
    spawn_server(HttpServer::frontend(config).expect("valid frontend config")).await
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
