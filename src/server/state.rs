use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;
use crate::engine::PlaylistEngine;
use crate::mcp::McpState;

pub type GuardedMcpState = Arc<McpState>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub mcp: GuardedMcpState,
}

impl ServerState {
    pub fn new(config: ServerConfig, mcp: GuardedMcpState) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            mcp,
        }
    }

    pub fn engine(&self) -> &PlaylistEngine {
        &self.mcp.engine
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedMcpState {
    fn from_ref(input: &ServerState) -> Self {
        input.mcp.clone()
    }
}
