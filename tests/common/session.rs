//! In-process MCP session for tool-level tests
//!
//! Drives [`McpSession::handle_message`] directly, without a transport.

use super::fixtures::create_test_dataset;
use playlist_mcp_server::mcp::{create_mcp_state, McpSession, McpState, RateLimitConfig};
use playlist_mcp_server::{Dataset, PlaylistEngine};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestSession {
    pub state: Arc<McpState>,
    session: McpSession,
    next_id: i64,
    _temp_dir: Option<TempDir>,
}

impl TestSession {
    /// Session over the fixture dataset with default rate limits, not yet initialized.
    pub fn new() -> Self {
        Self::with_rate_limit(RateLimitConfig::default())
    }

    pub fn with_rate_limit(rate_limit: RateLimitConfig) -> Self {
        let (temp_dir, path) = create_test_dataset().expect("Failed to create test dataset");
        let dataset = Dataset::try_load(&path).expect("Failed to load test dataset");
        Self::from_dataset(dataset, rate_limit, Some(temp_dir))
    }

    pub fn from_dataset(
        dataset: Dataset,
        rate_limit: RateLimitConfig,
        temp_dir: Option<TempDir>,
    ) -> Self {
        let engine = Arc::new(PlaylistEngine::new(dataset));
        let state = Arc::new(create_mcp_state(engine, rate_limit));
        let session = state.open_session();
        Self {
            state,
            session,
            next_id: 1,
            _temp_dir: temp_dir,
        }
    }

    /// Session that already completed the initialize handshake.
    pub async fn initialized() -> Self {
        let mut session = Self::new();
        session.initialize().await;
        session
    }

    pub async fn initialize(&mut self) -> Value {
        let response = self
            .request(
                "initialize",
                Some(json!({
                    "protocolVersion": "2024-11-05",
                    "clientInfo": { "name": "e2e-tests", "version": "1.0" }
                })),
            )
            .await;
        self.send_raw(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        response
    }

    /// Sends a raw line and returns the serialized response, if any.
    pub async fn send_raw(&mut self, text: &str) -> Option<Value> {
        self.session
            .handle_message(text)
            .await
            .map(|response| serde_json::to_value(response).expect("Failed to serialize response"))
    }

    /// Sends a request with a fresh id and returns the full JSON-RPC response.
    pub async fn request(&mut self, method: &str, params: Option<Value>) -> Value {
        let id = self.next_id;
        self.next_id += 1;

        let mut message = json!({ "jsonrpc": "2.0", "id": id, "method": method });
        if let Some(params) = params {
            message["params"] = params;
        }
        let response = self
            .send_raw(&message.to_string())
            .await
            .expect("Request produced no response");
        assert_eq!(response["id"], json!(id));
        response
    }

    /// Calls a tool and returns the full JSON-RPC response.
    pub async fn call_tool_raw(&mut self, name: &str, arguments: Value) -> Value {
        self.request(
            "tools/call",
            Some(json!({ "name": name, "arguments": arguments })),
        )
        .await
    }

    /// Calls a tool that is expected to succeed and returns its text.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> String {
        let response = self.call_tool_raw(name, arguments).await;
        assert!(
            response.get("error").is_none(),
            "{} failed: {}",
            name,
            response
        );
        assert_ne!(response["result"]["isError"], json!(true), "{}", response);
        response["result"]["content"][0]["text"]
            .as_str()
            .expect("Tool result has no text content")
            .to_string()
    }
}

/// Error code of a JSON-RPC error response.
pub fn error_code(response: &Value) -> i64 {
    response["error"]["code"]
        .as_i64()
        .unwrap_or_else(|| panic!("Expected an error response, got {}", response))
}
