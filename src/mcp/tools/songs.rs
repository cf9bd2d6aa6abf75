//! Song Tools
//!
//! Similarity search and single-song analysis.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::format::{or_na, or_unknown, track_entry};
use crate::engine::TrackAnalysis;
use crate::mcp::context::ToolContext;
use crate::mcp::protocol::{McpError, ToolsCallResult};
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolCategory, ToolResult};

pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(find_similar_songs_tool());
    registry.register_tool(analyze_song_tool());
}

fn not_found(ctx: &ToolContext, song_name: &str) -> ToolsCallResult {
    debug!("Client {} looked up unknown song '{}'", ctx.client_id, song_name);
    ToolsCallResult::text(format!("Song '{}' not found in dataset.", song_name))
}

// ============================================================================
// find_similar_songs
// ============================================================================

#[derive(Debug, Deserialize)]
struct SimilarSongsParams {
    song_name: String,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default = "default_count")]
    count: usize,
}

fn default_count() -> usize {
    5
}

fn find_similar_songs_tool() -> RegisteredTool {
    ToolBuilder::new("find_similar_songs")
        .description("Find songs similar to a reference song based on audio features")
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "song_name": {
                    "type": "string",
                    "description": "Name of the reference song"
                },
                "artist": {
                    "type": "string",
                    "description": "Artist name (optional, helps with accuracy)"
                },
                "count": {
                    "type": "integer",
                    "description": "Number of similar songs to return (default 5)",
                    "minimum": 0
                }
            },
            "required": ["song_name"]
        }))
        .category(ToolCategory::Generate)
        .activity("finding similar songs")
        .build(find_similar_songs_handler)
}

async fn find_similar_songs_handler(ctx: ToolContext, params: Value) -> ToolResult {
    let params: SimilarSongsParams =
        serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let similar = ctx.engine.find_similar_songs(
        &params.song_name,
        params.artist.as_deref().filter(|a| !a.is_empty()),
        params.count,
    );
    let Some(similar) = similar else {
        return Ok(not_found(&ctx, &params.song_name));
    };
    if similar.is_empty() {
        return Ok(ToolsCallResult::text(format!(
            "No similar songs found for '{}'.",
            params.song_name
        )));
    }

    let mut text = format!("**Songs similar to '{}'**\n\n", params.song_name);
    for (i, song) in similar.iter().enumerate() {
        let details = format!(
            "Similarity: {:.3} | Genre: {}",
            song.similarity,
            or_unknown(song.track.genre.as_deref())
        );
        text.push_str(&track_entry(i + 1, &song.track, &details));
    }

    Ok(ToolsCallResult::text(text))
}

// ============================================================================
// analyze_song
// ============================================================================

#[derive(Debug, Deserialize)]
struct AnalyzeSongParams {
    song_name: String,
    #[serde(default)]
    artist: Option<String>,
}

fn analyze_song_tool() -> RegisteredTool {
    ToolBuilder::new("analyze_song")
        .description("Get a detailed audio feature analysis of a specific song")
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "song_name": {
                    "type": "string",
                    "description": "Name of the song to analyze"
                },
                "artist": {
                    "type": "string",
                    "description": "Artist name (optional, helps with accuracy)"
                }
            },
            "required": ["song_name"]
        }))
        .category(ToolCategory::Lookup)
        .activity("analyzing song")
        .build(analyze_song_handler)
}

async fn analyze_song_handler(ctx: ToolContext, params: Value) -> ToolResult {
    let params: AnalyzeSongParams =
        serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    match ctx
        .engine
        .analyze_song(&params.song_name, params.artist.as_deref().filter(|a| !a.is_empty()))
    {
        Some(analysis) => Ok(ToolsCallResult::text(render_analysis(&analysis))),
        None => Ok(not_found(&ctx, &params.song_name)),
    }
}

fn render_analysis(song: &TrackAnalysis) -> String {
    let mut text = format!("**Analysis for '{}' by {}**\n\n", song.name, song.artist);

    text.push_str("**Audio Features:**\n");
    for (label, value) in [
        ("Energy", song.energy),
        ("Valence (Mood)", song.valence),
        ("Danceability", song.danceability),
        ("Acousticness", song.acousticness),
        ("Instrumentalness", song.instrumentalness),
        ("Speechiness", song.speechiness),
        ("Liveness", song.liveness),
    ] {
        text.push_str(&format!("• {}: {:.3}/1.0\n", label, value));
    }

    text.push_str("\n**Technical Info:**\n");
    text.push_str(&format!("• Tempo: {:.1} BPM\n", song.tempo));
    text.push_str(&format!("• Key: {}\n", or_unknown(song.key)));
    text.push_str(&format!("• Mode: {}\n", or_unknown(song.mode)));
    text.push_str(&format!(
        "• Loudness: {}\n",
        or_unknown(song.loudness.map(|db| format!("{:.1} dB", db)))
    ));
    text.push_str(&format!(
        "• Duration: {}\n",
        or_unknown(song.duration_seconds.map(|s| format!("{:.1} seconds", s)))
    ));

    text.push_str("\n**Metadata:**\n");
    text.push_str(&format!("• Popularity: {}/100\n", or_na(song.popularity)));
    text.push_str(&format!("• Genre: {}\n", or_unknown(song.genre.as_deref())));
    if let Some(subgenre) = &song.subgenre {
        text.push_str(&format!("• Subgenre: {}\n", subgenre));
    }
    text.push_str(&format!("• Album: {}\n", or_unknown(song.album.as_deref())));
    if let Some(release_date) = &song.release_date {
        text.push_str(&format!("• Released: {}\n", release_date));
    }

    text
}
