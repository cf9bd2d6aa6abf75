//! MCP WebSocket Handler
//!
//! Handles WebSocket connections for MCP protocol.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, error};

use super::session::McpState;
use crate::server::state::GuardedMcpState;

/// WebSocket upgrade handler for MCP
pub async fn mcp_handler(ws: WebSocketUpgrade, State(mcp_state): State<GuardedMcpState>) -> Response {
    ws.on_upgrade(move |socket| handle_mcp_socket(socket, mcp_state))
}

/// Handle an established MCP WebSocket connection
async fn handle_mcp_socket(socket: WebSocket, mcp_state: Arc<McpState>) {
    let mut session = mcp_state.open_session();
    let client_id = session.client_id();
    debug!("MCP connection established for client {}", client_id);

    let (mut ws_sink, mut ws_stream) = socket.split();

    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if let Some(response) = session.handle_message(&text).await {
                    match serde_json::to_string(&response) {
                        Ok(json) => {
                            if ws_sink.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            error!("Failed to serialize MCP response: {}", e);
                        }
                    }
                }
                if session.is_closed() {
                    let _ = ws_sink.send(Message::Close(None)).await;
                    break;
                }
            }
            Ok(Message::Binary(_)) => {
                debug!("Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) => {
                // Axum/tungstenite handles pong automatically
            }
            Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                debug!("Received close frame");
                break;
            }
            Err(e) => {
                debug!("WebSocket error: {}", e);
                break;
            }
        }
    }

    debug!("MCP connection closed for client {}", client_id);
}
