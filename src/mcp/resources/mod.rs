//! MCP Resources
//!
//! Read-only JSON views of the dataset statistics and the mood catalog.

use serde::Serialize;

use super::context::ToolContext;
use super::protocol::{McpError, ResourceContent};
use super::registry::{McpRegistry, RegisteredResource, ResourceBuilder, ResourceResult};
use crate::engine::{Mood, Predicate};

const JSON_MIME: &str = "application/json";

/// Register all resources with the registry
pub fn register_all_resources(registry: &mut McpRegistry) {
    registry.register_resource(dataset_stats_resource());
    registry.register_resource(mood_catalog_resource());
}

fn json_content<T: Serialize>(uri: String, value: &T) -> ResourceResult {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| McpError::InternalError(e.to_string()))?;
    Ok(vec![ResourceContent {
        uri,
        mime_type: Some(JSON_MIME.to_string()),
        text,
    }])
}

// ============================================================================
// dataset://stats
// ============================================================================

fn dataset_stats_resource() -> RegisteredResource {
    ResourceBuilder::new("dataset://stats", "Dataset Statistics")
        .description("Row counts, feature averages and genre rankings of the loaded dataset")
        .mime_type(JSON_MIME)
        .build(dataset_stats_handler)
}

async fn dataset_stats_handler(ctx: ToolContext, uri: String) -> ResourceResult {
    json_content(uri, &ctx.engine.dataset_stats())
}

// ============================================================================
// moods://catalog
// ============================================================================

#[derive(Serialize)]
struct MoodEntry {
    mood: Mood,
    predicates: &'static [Predicate],
}

fn mood_catalog_resource() -> RegisteredResource {
    ResourceBuilder::new("moods://catalog", "Mood Catalog")
        .description("Supported moods and their thresholds on standardized audio features")
        .mime_type(JSON_MIME)
        .build(mood_catalog_handler)
}

async fn mood_catalog_handler(_ctx: ToolContext, uri: String) -> ResourceResult {
    let catalog: Vec<MoodEntry> = Mood::ALL
        .into_iter()
        .map(|mood| MoodEntry {
            mood,
            predicates: mood.predicates(),
        })
        .collect();
    json_content(uri, &catalog)
}
