//! End-to-end tests for the MCP tools over an in-process session

mod common;

use common::*;
use playlist_mcp_server::mcp::stdio::serve_lines;
use playlist_mcp_server::mcp::{create_mcp_state, RateLimitConfig};
use playlist_mcp_server::{Dataset, PlaylistEngine};
use serde_json::{json, Value};
use std::sync::Arc;

// =============================================================================
// Protocol
// =============================================================================

#[tokio::test]
async fn test_initialize_reports_server_info() {
    let mut session = TestSession::new();
    let response = session.initialize().await;

    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], "playlist-mcp");
    assert!(response["result"]["capabilities"]["tools"].is_object());
    assert!(response["result"]["capabilities"]["resources"].is_object());
}

#[tokio::test]
async fn test_tools_require_initialize() {
    let mut session = TestSession::new();
    let response = session.request("tools/list", None).await;
    assert_eq!(error_code(&response), -32600);

    let response = session
        .call_tool_raw("get_dataset_stats", json!({}))
        .await;
    assert_eq!(error_code(&response), -32600);
}

#[tokio::test]
async fn test_ping_works_before_initialize() {
    let mut session = TestSession::new();
    let response = session.request("ping", None).await;
    assert!(response.get("error").is_none());
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn test_tools_list_is_sorted() {
    let mut session = TestSession::initialized().await;
    let response = session.request("tools/list", None).await;

    let names: Vec<&str> = response["result"]["tools"]
        .as_array()
        .expect("tools is not an array")
        .iter()
        .map(|tool| tool["name"].as_str().expect("tool without a name"))
        .collect();
    assert_eq!(
        names,
        vec![
            "analyze_song",
            "create_genre_playlist",
            "create_mood_playlist",
            "find_similar_songs",
            "get_dataset_stats",
        ]
    );
    for tool in response["result"]["tools"].as_array().unwrap() {
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let mut session = TestSession::initialized().await;
    let response = session
        .send_raw(r#"{"jsonrpc":"2.0","method":"tools/list"}"#)
        .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_malformed_messages() {
    let mut session = TestSession::initialized().await;

    let response = session.send_raw("{not json").await.unwrap();
    assert_eq!(error_code(&response), -32700);
    assert_eq!(response["id"], Value::Null);

    let response = session.send_raw(r#"{"id":1}"#).await.unwrap();
    assert_eq!(error_code(&response), -32600);

    let response = session
        .send_raw(r#"{"jsonrpc":"1.0","id":7,"method":"ping"}"#)
        .await
        .unwrap();
    assert_eq!(error_code(&response), -32600);
    assert_eq!(response["id"], 7);
}

#[tokio::test]
async fn test_unknown_method_and_tool() {
    let mut session = TestSession::initialized().await;

    let response = session.request("songs/shuffle", None).await;
    assert_eq!(error_code(&response), -32601);

    let response = session.call_tool_raw("delete_everything", json!({})).await;
    assert_eq!(error_code(&response), -32601);
}

#[tokio::test]
async fn test_string_request_ids_are_echoed() {
    let mut session = TestSession::initialized().await;
    let response = session
        .send_raw(r#"{"jsonrpc":"2.0","id":"abc","method":"ping"}"#)
        .await
        .unwrap();
    assert_eq!(response["id"], "abc");
}

// =============================================================================
// create_mood_playlist
// =============================================================================

#[tokio::test]
async fn test_mood_playlist_is_deterministic() {
    let mut first = TestSession::initialized().await;
    let mut second = TestSession::initialized().await;
    let args = json!({ "mood": "happy", "size": 3 });

    let a = first.call_tool("create_mood_playlist", args.clone()).await;
    let b = second.call_tool("create_mood_playlist", args.clone()).await;
    let c = first.call_tool("create_mood_playlist", args).await;

    assert!(a.starts_with("**Happy Mood Playlist** (3 songs)"), "{}", a);
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert!(a.contains("Energy: "));
}

#[tokio::test]
async fn test_mood_playlist_returns_all_matches_when_size_exceeds_them() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool("create_mood_playlist", json!({ "mood": "happy", "size": 50 }))
        .await;

    // Five fixture tracks have clearly above-average valence.
    assert!(text.contains("(5 songs)"), "{}", text);
    assert!(!text.contains("Street Rhymes"));
}

#[tokio::test]
async fn test_mood_playlist_unknown_mood() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool("create_mood_playlist", json!({ "mood": "grumpy" }))
        .await;
    assert_eq!(
        text,
        "No songs found for mood 'grumpy' with the specified filters."
    );
}

#[tokio::test]
async fn test_mood_playlist_filters() {
    let mut session = TestSession::initialized().await;

    let text = session
        .call_tool(
            "create_mood_playlist",
            json!({ "mood": "happy", "genre": "EDM", "size": 10 }),
        )
        .await;
    assert!(text.contains("Party Starter"), "{}", text);
    assert!(text.contains("Festival Anthem"), "{}", text);
    assert!(!text.contains("Sunny Day"));

    let text = session
        .call_tool(
            "create_mood_playlist",
            json!({ "mood": "happy", "min_popularity": 101 }),
        )
        .await;
    assert_eq!(
        text,
        "No songs found for mood 'happy' with the specified filters."
    );
}

#[tokio::test]
async fn test_mood_playlist_duration_mode() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool(
            "create_mood_playlist",
            json!({ "mood": "happy", "duration_minutes": 7.0 }),
        )
        .await;

    // Shortest first: 3.0 + 3.02 minutes, the next track would pass 7.5.
    assert!(text.starts_with("**Happy Mood Playlist** (2 songs)"), "{}", text);
    assert!(
        text.contains("Total duration: 6.0 minutes (target: 7.0)"),
        "{}",
        text
    );
}

#[tokio::test]
async fn test_mood_playlist_duration_without_durations() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool(
            "create_mood_playlist",
            json!({ "mood": "energetic", "genre": "r&b", "duration_minutes": 30 }),
        )
        .await;
    assert_eq!(
        text,
        "No songs with duration information match the filters for mood 'energetic'."
    );
}

#[tokio::test]
async fn test_mood_playlist_invalid_params() {
    let mut session = TestSession::initialized().await;

    let response = session
        .call_tool_raw("create_mood_playlist", json!({ "mood": "happy", "size": -1 }))
        .await;
    assert_eq!(error_code(&response), -32602);

    let response = session
        .call_tool_raw("create_mood_playlist", json!({ "size": 3 }))
        .await;
    assert_eq!(error_code(&response), -32602);
}

// =============================================================================
// find_similar_songs
// =============================================================================

#[tokio::test]
async fn test_similar_songs_skip_reference_duplicates() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool(
            "find_similar_songs",
            json!({
                "song_name": DUPLICATED_SONG,
                "artist": DUPLICATED_ARTIST,
                "count": 3
            }),
        )
        .await;

    assert!(text.starts_with("**Songs similar to 'Sunny Day'**"), "{}", text);
    assert_eq!(text.matches("Similarity: ").count(), 3);
    // The remaster shares name and artist with the reference.
    assert!(!text.contains("**Sunny Day**"), "{}", text);
}

#[tokio::test]
async fn test_similar_songs_are_unique_and_bounded() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool(
            "find_similar_songs",
            json!({ "song_name": "rainy night", "count": 100 }),
        )
        .await;

    // Ten other tracks, two of which share one identity.
    assert_eq!(text.matches("Similarity: ").count(), LOADED_TRACKS - 2);
    assert_eq!(text.matches("**Sunny Day**").count(), 1);
}

#[tokio::test]
async fn test_similar_songs_not_found() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool("find_similar_songs", json!({ "song_name": MISSING_SONG }))
        .await;
    assert_eq!(text, format!("Song '{}' not found in dataset.", MISSING_SONG));
}

#[tokio::test]
async fn test_similar_songs_with_nothing_to_rank() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool(
            "find_similar_songs",
            json!({ "song_name": DUPLICATED_SONG, "count": 0 }),
        )
        .await;
    assert_eq!(text, format!("No similar songs found for '{}'.", DUPLICATED_SONG));
}

// =============================================================================
// analyze_song
// =============================================================================

#[tokio::test]
async fn test_analyze_song() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool(
            "analyze_song",
            json!({ "song_name": "party starter", "artist": "dj loud" }),
        )
        .await;

    assert!(text.starts_with("**Analysis for 'Party Starter' by DJ Loud**"));
    assert!(text.contains("• Energy: 0.950/1.0"));
    assert!(text.contains("• Tempo: 128.0 BPM"));
    assert!(text.contains("• Key: 7"));
    assert!(text.contains("• Loudness: -3.2 dB"));
    assert!(text.contains("• Duration: 200.0 seconds"));
    assert!(text.contains("• Popularity: 91/100"));
    assert!(text.contains("• Subgenre: electro house"));
    assert!(text.contains("• Released: 2021-07-01"));
}

#[tokio::test]
async fn test_analyze_song_missing_values() {
    let mut session = TestSession::initialized().await;

    let text = session
        .call_tool("analyze_song", json!({ "song_name": NO_DURATION_SONG }))
        .await;
    assert!(text.contains("• Duration: Unknown"), "{}", text);

    let text = session
        .call_tool("analyze_song", json!({ "song_name": "Festival Anthem" }))
        .await;
    assert!(text.contains("• Energy: 0.500/1.0"), "{}", text);
}

#[tokio::test]
async fn test_analyze_song_uses_first_match() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool("analyze_song", json!({ "song_name": DUPLICATED_SONG }))
        .await;
    assert!(text.contains("• Album: Bright Album\n"), "{}", text);
}

#[tokio::test]
async fn test_analyze_song_not_found() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool(
            "analyze_song",
            json!({ "song_name": "Sunny Day", "artist": "Nobody" }),
        )
        .await;
    assert_eq!(text, "Song 'Sunny Day' not found in dataset.");
}

// =============================================================================
// create_genre_playlist
// =============================================================================

#[tokio::test]
async fn test_genre_playlist() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool("create_genre_playlist", json!({ "genres": ["edm"] }))
        .await;

    assert!(text.starts_with("**Genre Playlist: edm** (2 songs)"), "{}", text);
    assert!(text.contains("Party Starter"));
    assert!(text.contains("Festival Anthem"));
}

#[tokio::test]
async fn test_genre_playlist_high_diversity() {
    let mut session = TestSession::initialized().await;
    let args = json!({ "genres": ["pop", "rock"], "size": 2, "diversity": "high" });

    let first = session.call_tool("create_genre_playlist", args.clone()).await;
    let second = session.call_tool("create_genre_playlist", args).await;

    assert!(first.starts_with("**Genre Playlist: pop, rock** (2 songs)"), "{}", first);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_genre_playlist_unknown_diversity_falls_back() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool(
            "create_genre_playlist",
            json!({ "genres": ["latin"], "diversity": "extreme" }),
        )
        .await;
    assert!(text.contains("(2 songs)"), "{}", text);
}

#[tokio::test]
async fn test_genre_playlist_no_match() {
    let mut session = TestSession::initialized().await;
    let text = session
        .call_tool("create_genre_playlist", json!({ "genres": ["metal", "jazz"] }))
        .await;
    assert_eq!(text, "No songs found for genres: metal, jazz");
}

// =============================================================================
// get_dataset_stats and resources
// =============================================================================

#[tokio::test]
async fn test_dataset_stats() {
    let mut session = TestSession::initialized().await;
    let text = session.call_tool("get_dataset_stats", json!({})).await;

    assert!(text.starts_with("**Dataset Statistics**"));
    assert!(text.contains(&format!("• Total songs: {}", LOADED_TRACKS)));
    assert!(text.contains("**Top Genres:**"));
    assert!(text.contains("**Top Subgenres:**"));
}

#[tokio::test]
async fn test_resources() {
    let mut session = TestSession::initialized().await;

    let response = session.request("resources/list", None).await;
    let uris: Vec<&str> = response["result"]["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["uri"].as_str().unwrap())
        .collect();
    assert!(uris.contains(&"dataset://stats"));
    assert!(uris.contains(&"moods://catalog"));

    let response = session
        .request("resources/read", Some(json!({ "uri": "moods://catalog" })))
        .await;
    let content = &response["result"]["contents"][0];
    assert_eq!(content["mimeType"], "application/json");
    let catalog: Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
    assert_eq!(catalog.as_array().unwrap().len(), 6);
    assert_eq!(catalog[0]["mood"], "happy");
    assert_eq!(catalog[0]["predicates"][0]["feature"], "valence");

    let response = session
        .request("resources/read", Some(json!({ "uri": "dataset://stats" })))
        .await;
    let stats: Value =
        serde_json::from_str(response["result"]["contents"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(stats["total_songs"], LOADED_TRACKS);

    let response = session
        .request("resources/read", Some(json!({ "uri": "moods://nothing" })))
        .await;
    assert_eq!(error_code(&response), -32004);
}

// =============================================================================
// Rate limiting
// =============================================================================

#[tokio::test]
async fn test_generate_tools_are_rate_limited() {
    let mut session = TestSession::with_rate_limit(RateLimitConfig {
        lookup_per_minute: 100,
        generate_per_minute: 1,
    });
    session.initialize().await;

    session
        .call_tool("create_genre_playlist", json!({ "genres": ["pop"] }))
        .await;
    let response = session
        .call_tool_raw("find_similar_songs", json!({ "song_name": "Sunny Day" }))
        .await;
    assert_eq!(error_code(&response), -32003);
    assert!(response["error"]["data"]["retry_after_secs"].as_u64().is_some());

    // Lookups have their own budget.
    session.call_tool("get_dataset_stats", json!({})).await;
}

#[tokio::test]
async fn test_rate_limits_are_per_session() {
    let limits = RateLimitConfig {
        lookup_per_minute: 1,
        generate_per_minute: 1,
    };
    let mut session = TestSession::with_rate_limit(limits);
    session.initialize().await;
    session.call_tool("get_dataset_stats", json!({})).await;

    let mut other = session.state.open_session();
    let init = json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" }).to_string();
    other.handle_message(&init).await.unwrap();
    let call = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": { "name": "get_dataset_stats", "arguments": {} }
    })
    .to_string();
    let response = other.handle_message(&call).await.unwrap();
    assert!(response.error.is_none());
}

// =============================================================================
// Degraded dataset
// =============================================================================

#[tokio::test]
async fn test_missing_dataset_serves_empty_results() {
    let (_dir, path) = missing_dataset_path().unwrap();
    let mut session =
        TestSession::from_dataset(Dataset::load(&path), RateLimitConfig::default(), None);
    session.initialize().await;

    let text = session.call_tool("get_dataset_stats", json!({})).await;
    assert!(text.contains("• Total songs: 0"), "{}", text);

    let text = session
        .call_tool("create_mood_playlist", json!({ "mood": "happy" }))
        .await;
    assert_eq!(text, "No songs found for mood 'happy' with the specified filters.");

    let text = session
        .call_tool("analyze_song", json!({ "song_name": "Sunny Day" }))
        .await;
    assert_eq!(text, "Song 'Sunny Day' not found in dataset.");
}

// =============================================================================
// stdio transport
// =============================================================================

#[tokio::test]
async fn test_stdio_transport() {
    let (_dir, path) = create_test_dataset().unwrap();
    let engine = Arc::new(PlaylistEngine::new(Dataset::load(&path)));
    let state = Arc::new(create_mcp_state(engine, RateLimitConfig::default()));

    let input = [
        json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" }).to_string(),
        String::new(),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string(),
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": { "name": "get_dataset_stats", "arguments": {} }
        })
        .to_string(),
        json!({ "jsonrpc": "2.0", "id": 3, "method": "shutdown" }).to_string(),
        json!({ "jsonrpc": "2.0", "id": 4, "method": "ping" }).to_string(),
    ]
    .join("\n");

    let mut output: Vec<u8> = Vec::new();
    serve_lines(state, input.as_bytes(), &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    // Blank line and notification are skipped, nothing after shutdown is read.
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[1]["id"], 2);
    let text = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains(&format!("• Total songs: {}", LOADED_TRACKS)));
    assert_eq!(responses[2]["id"], 3);
    assert_eq!(responses[2]["result"], Value::Null);
}
