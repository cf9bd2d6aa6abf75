//! Shared constants for end-to-end tests
//!
//! When the fixture dataset changes, update only this file and fixtures.rs.

/// Rows in the fixture file that survive loading (one row lacks an artist).
pub const LOADED_TRACKS: usize = 11;

/// A track that appears twice (original and remaster) in the fixture.
pub const DUPLICATED_SONG: &str = "Sunny Day";
pub const DUPLICATED_ARTIST: &str = "The Brights";

/// The only track without a duration.
pub const NO_DURATION_SONG: &str = "Endless Jam";

pub const MISSING_SONG: &str = "NoSuchTrack";

/// Poll interval and timeout while waiting for a spawned server.
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;
