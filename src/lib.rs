//! Playlist MCP Server Library
//!
//! Song recommendation over a tabular track dataset, served as MCP tools.

pub mod config;
pub mod dataset;
pub mod engine;
pub mod mcp;
pub mod server;

// Re-export commonly used types for convenience
pub use dataset::{Dataset, DatasetError, Track};
pub use engine::PlaylistEngine;
pub use mcp::{create_mcp_state, McpState, RateLimitConfig};
pub use server::{run_server, RequestsLoggingLevel};
