//! MCP Tool Execution Context
//!
//! Provides access to server state for tool implementations.

use std::sync::Arc;

use crate::engine::PlaylistEngine;

/// Context provided to tool and resource handlers during execution
#[derive(Clone)]
pub struct ToolContext {
    /// Shared, read-only recommendation engine
    pub engine: Arc<PlaylistEngine>,

    /// Session the call arrived on
    pub client_id: u64,
}
