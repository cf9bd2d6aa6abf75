//! Dataset Tools

use serde_json::Value;

use super::format::with_thousands;
use crate::engine::DatasetStats;
use crate::mcp::context::ToolContext;
use crate::mcp::protocol::ToolsCallResult;
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolCategory, ToolResult};

pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(get_dataset_stats_tool());
}

fn get_dataset_stats_tool() -> RegisteredTool {
    ToolBuilder::new("get_dataset_stats")
        .description("Get descriptive statistics about the music dataset")
        .category(ToolCategory::Lookup)
        .activity("getting dataset statistics")
        .build(get_dataset_stats_handler)
}

async fn get_dataset_stats_handler(ctx: ToolContext, _params: Value) -> ToolResult {
    let stats = ctx.engine.dataset_stats();
    Ok(ToolsCallResult::text(render_stats(&stats)))
}

fn render_stats(stats: &DatasetStats) -> String {
    let mut text = String::from("**Dataset Statistics**\n\n");
    text.push_str(&format!("• Total songs: {}\n", with_thousands(stats.total_songs)));
    text.push_str(&format!(
        "• Unique artists: {}\n",
        with_thousands(stats.unique_artists)
    ));
    text.push_str(&format!(
        "• Unique albums: {}\n",
        with_thousands(stats.unique_albums)
    ));
    if let Some(popularity) = &stats.popularity {
        text.push_str(&format!(
            "• Average popularity: {:.1}/100 (range {:.0} - {:.0})\n",
            popularity.mean, popularity.min, popularity.max
        ));
    }
    for (label, value) in [
        ("Average energy", stats.avg_energy),
        ("Average valence", stats.avg_valence),
        ("Average danceability", stats.avg_danceability),
    ] {
        if let Some(value) = value {
            text.push_str(&format!("• {}: {:.3}/1.0\n", label, value));
        }
    }
    if let Some(tempo) = &stats.tempo {
        text.push_str(&format!(
            "• Tempo range: {:.0} - {:.0} BPM (average {:.0})\n",
            tempo.min, tempo.max, tempo.mean
        ));
    }
    if let Some(minutes) = stats.avg_duration_minutes {
        text.push_str(&format!("• Average duration: {:.1} minutes\n", minutes));
    }

    if !stats.top_genres.is_empty() {
        text.push_str("\n**Top Genres:**\n");
        for (genre, count) in &stats.top_genres {
            text.push_str(&format!("• {}: {} songs\n", genre, with_thousands(*count)));
        }
    }
    if !stats.top_subgenres.is_empty() {
        text.push_str("\n**Top Subgenres:**\n");
        for (subgenre, count) in &stats.top_subgenres {
            text.push_str(&format!("• {}: {} songs\n", subgenre, with_thousands(*count)));
        }
    }

    text
}
