//! Test server lifecycle management
//!
//! Spawns the websocket transport on a random port. Each test gets an
//! isolated server with its own dataset.

use super::constants::*;
use super::fixtures::create_test_dataset;
use playlist_mcp_server::mcp::{create_mcp_state, RateLimitConfig};
use playlist_mcp_server::server::{make_app, RequestsLoggingLevel, ServerConfig, ServerState};
use playlist_mcp_server::{Dataset, PlaylistEngine};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
///
/// When dropped, the server gracefully shuts down and the dataset is removed.
pub struct TestServer {
    /// Base URL for HTTP requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Websocket URL of the MCP endpoint
    pub mcp_url: String,

    pub port: u16,

    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if the dataset cannot be written, the port cannot be bound, or
    /// the server does not become ready within the timeout.
    pub async fn spawn() -> Self {
        let (temp_dir, path) = create_test_dataset().expect("Failed to create test dataset");
        let dataset = Dataset::try_load(&path).expect("Failed to load test dataset");
        let engine = Arc::new(PlaylistEngine::new(dataset));
        let mcp = Arc::new(create_mcp_state(engine, RateLimitConfig::default()));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
        };
        let app = make_app(ServerState::new(config, mcp));

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            mcp_url: format!("ws://127.0.0.1:{}/v1/mcp", port),
            port,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Polls the home page until it answers.
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
