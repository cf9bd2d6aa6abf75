use anyhow::{Context, Result};
use axum::{extract::State, middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use super::state::ServerState;
use super::{log_requests, ServerConfig};
use crate::mcp::{mcp_handler, McpState};

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> String {
    format!(
        "playlist-mcp {}\n{} tracks loaded\nuptime {}\nMCP endpoint: /v1/mcp\n",
        crate::mcp::session::server_version(),
        state.engine().dataset().len(),
        format_uptime(state.start_time.elapsed())
    )
}

pub fn make_app(state: ServerState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/v1/mcp", get(mcp_handler))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

/// Serves on an already bound listener until the server fails.
pub async fn serve(listener: TcpListener, config: ServerConfig, mcp: Arc<McpState>) -> Result<()> {
    let app = make_app(ServerState::new(config, mcp));
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }
    axum::serve(listener, app).await.context("Server error")
}

pub async fn run_server(config: ServerConfig, mcp: Arc<McpState>) -> Result<()> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    serve(listener, config, mcp).await
}
