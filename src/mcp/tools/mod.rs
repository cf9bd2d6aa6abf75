//! MCP Tools
//!
//! Playlist generation, song lookups and dataset statistics.

pub mod dataset;
mod format;
pub mod playlists;
pub mod songs;

use super::registry::McpRegistry;

/// Register all tools with the registry
pub fn register_all_tools(registry: &mut McpRegistry) {
    playlists::register_tools(registry);
    songs::register_tools(registry);
    dataset::register_tools(registry);
}
