//! Playlist Tools
//!
//! Mood and genre playlist generation.

use serde::Deserialize;
use serde_json::Value;

use super::format::{or_na, or_unknown, title_case, track_entry};
use crate::engine::{DiversityLevel, MoodPlaylist, MoodPlaylistRequest, TrackSummary};
use crate::mcp::context::ToolContext;
use crate::mcp::protocol::{McpError, ToolsCallResult};
use crate::mcp::registry::{McpRegistry, RegisteredTool, ToolBuilder, ToolCategory, ToolResult};

pub fn register_tools(registry: &mut McpRegistry) {
    registry.register_tool(create_mood_playlist_tool());
    registry.register_tool(create_genre_playlist_tool());
}

// ============================================================================
// create_mood_playlist
// ============================================================================

#[derive(Debug, Deserialize)]
struct MoodPlaylistParams {
    mood: String,
    #[serde(default = "default_mood_size")]
    size: usize,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    min_popularity: u32,
    #[serde(default)]
    duration_minutes: Option<f64>,
}

fn default_mood_size() -> usize {
    10
}

fn create_mood_playlist_tool() -> RegisteredTool {
    ToolBuilder::new("create_mood_playlist")
        .description(
            "Create a playlist based on mood and preferences. Moods: happy, sad, energetic, \
             calm, party, chill. With duration_minutes the playlist approximates that total \
             playtime instead of a fixed size.",
        )
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "mood": {
                    "type": "string",
                    "enum": ["happy", "sad", "energetic", "calm", "party", "chill"],
                    "description": "The mood for the playlist"
                },
                "size": {
                    "type": "integer",
                    "description": "Number of songs in the playlist (default 10)",
                    "minimum": 0
                },
                "genre": {
                    "type": "string",
                    "description": "Optional genre filter (e.g. pop, rock, edm, rap, latin)"
                },
                "min_popularity": {
                    "type": "integer",
                    "description": "Minimum popularity score (0-100, default 0)",
                    "minimum": 0,
                    "maximum": 100
                },
                "duration_minutes": {
                    "type": "number",
                    "description": "Optional target playlist length in minutes"
                }
            },
            "required": ["mood"]
        }))
        .category(ToolCategory::Generate)
        .activity("creating mood playlist")
        .build(create_mood_playlist_handler)
}

async fn create_mood_playlist_handler(ctx: ToolContext, params: Value) -> ToolResult {
    let params: MoodPlaylistParams =
        serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let request = MoodPlaylistRequest {
        mood: &params.mood,
        size: params.size,
        genre: params.genre.as_deref().filter(|g| !g.is_empty()),
        min_popularity: params.min_popularity,
        duration_minutes: params.duration_minutes,
    };

    let tracks = match ctx.engine.create_mood_playlist(&request) {
        MoodPlaylist::NoDurationPool => {
            return Ok(ToolsCallResult::text(format!(
                "No songs with duration information match the filters for mood '{}'.",
                params.mood
            )));
        }
        MoodPlaylist::Tracks(tracks) if tracks.is_empty() => {
            return Ok(ToolsCallResult::text(format!(
                "No songs found for mood '{}' with the specified filters.",
                params.mood
            )));
        }
        MoodPlaylist::Tracks(tracks) => tracks,
    };

    let mut text = format!(
        "**{} Mood Playlist** ({} songs)\n\n",
        title_case(&params.mood),
        tracks.len()
    );
    if let Some(target) = request.duration_minutes.filter(|m| *m > 0.0) {
        let total: f64 = tracks.iter().map(|t| t.duration_minutes).sum();
        text.push_str(&format!(
            "Total duration: {:.1} minutes (target: {:.1})\n\n",
            total, target
        ));
    }
    for (i, track) in tracks.iter().enumerate() {
        let details = format!(
            "Genre: {} | Popularity: {} | Energy: {:.2}",
            or_unknown(track.genre.as_deref()),
            or_na(track.popularity),
            track.energy
        );
        text.push_str(&track_entry(i + 1, track, &details));
    }

    Ok(ToolsCallResult::text(text))
}

// ============================================================================
// create_genre_playlist
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenrePlaylistParams {
    genres: Vec<String>,
    #[serde(default = "default_genre_size")]
    size: usize,
    #[serde(default)]
    diversity: Option<String>,
}

fn default_genre_size() -> usize {
    15
}

fn create_genre_playlist_tool() -> RegisteredTool {
    ToolBuilder::new("create_genre_playlist")
        .description(
            "Create a playlist focused on specific genres. Diversity 'high' spreads the \
             selection across the audio feature space; 'low' and 'medium' sample at random.",
        )
        .input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "genres": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Genres to include (e.g. edm, rap, pop, r&b, latin, rock)"
                },
                "size": {
                    "type": "integer",
                    "description": "Number of songs in the playlist (default 15)",
                    "minimum": 0
                },
                "diversity": {
                    "type": "string",
                    "enum": ["low", "medium", "high"],
                    "description": "Diversity level (default medium)"
                }
            },
            "required": ["genres"]
        }))
        .category(ToolCategory::Generate)
        .activity("creating genre playlist")
        .build(create_genre_playlist_handler)
}

async fn create_genre_playlist_handler(ctx: ToolContext, params: Value) -> ToolResult {
    let params: GenrePlaylistParams =
        serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let diversity = params
        .diversity
        .as_deref()
        .map(DiversityLevel::parse_lossy)
        .unwrap_or_default();
    let tracks = ctx
        .engine
        .create_genre_playlist(&params.genres, params.size, diversity);

    let genres = params.genres.join(", ");
    if tracks.is_empty() {
        return Ok(ToolsCallResult::text(format!(
            "No songs found for genres: {}",
            genres
        )));
    }

    Ok(ToolsCallResult::text(render_genre_playlist(&genres, &tracks)))
}

fn render_genre_playlist(genres: &str, tracks: &[TrackSummary]) -> String {
    let mut text = format!("**Genre Playlist: {}** ({} songs)\n\n", genres, tracks.len());
    for (i, track) in tracks.iter().enumerate() {
        let details = format!(
            "Genre: {} | Popularity: {}",
            or_unknown(track.genre.as_deref()),
            or_na(track.popularity)
        );
        text.push_str(&track_entry(i + 1, track, &details));
    }
    text
}
