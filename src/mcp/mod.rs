//! MCP (Model Context Protocol) Server
//!
//! Exposes the playlist engine as MCP tools and resources.
//!
//! ## Architecture
//!
//! - Transports: newline-delimited stdio, or WebSocket at `/v1/mcp`
//! - Sessions: one per connection, each with its own rate-limit budget
//! - Tools: playlist generation, song lookups, dataset statistics
//! - Resources: read-only JSON views (statistics, mood catalog)

pub mod context;
pub mod handler;
pub mod protocol;
pub mod rate_limit;
pub mod registry;
pub mod resources;
pub mod session;
pub mod stdio;
pub mod tools;

pub use handler::mcp_handler;
pub use protocol::{McpError, McpRequest, McpResponse};
pub use rate_limit::RateLimitConfig;
pub use registry::McpRegistry;
pub use session::{create_mcp_state, McpSession, McpState};
