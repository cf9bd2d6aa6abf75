//! Recommendation engine: mood filtering, similarity search, genre
//! playlists and statistics over a loaded [`Dataset`].

mod diversity;
mod duration;
mod mood;
mod sampling;
mod similarity;
mod stats;
mod summary;

pub use diversity::select_diverse;
pub use duration::{pack, PackOutcome, DURATION_TOLERANCE_MINUTES};
pub use mood::{Bound, Mood, MoodFilter, MoodFilterOptions, Predicate};
pub use sampling::{sample_fixed, SAMPLE_SEED};
pub use similarity::{cosine_similarity, SimilarTrack, SimilarityRanker};
pub use stats::{DatasetStats, ValueRange};
pub use summary::{TrackAnalysis, TrackSummary};

use crate::dataset::{contains_ignore_case, Dataset, FeatureVector, Track};
use serde::Serialize;
use tracing::debug;

/// Smallest candidate pool drawn before duration packing.
pub const MIN_DURATION_POOL: usize = 200;
/// Pool size per requested track before duration packing.
pub const DURATION_POOL_FACTOR: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiversityLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl DiversityLevel {
    /// Unknown levels fall back to the default.
    pub fn parse_lossy(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "low" => DiversityLevel::Low,
            "high" => DiversityLevel::High,
            _ => DiversityLevel::Medium,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MoodPlaylistRequest<'q> {
    pub mood: &'q str,
    pub size: usize,
    pub genre: Option<&'q str>,
    pub min_popularity: u32,
    /// Only positive values switch to duration packing.
    pub duration_minutes: Option<f64>,
}

impl<'q> MoodPlaylistRequest<'q> {
    pub fn new(mood: &'q str, size: usize) -> Self {
        MoodPlaylistRequest {
            mood,
            size,
            genre: None,
            min_popularity: 0,
            duration_minutes: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MoodPlaylist {
    Tracks(Vec<TrackSummary>),
    /// Duration packing was requested but no candidate has a duration.
    NoDurationPool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimilarSong {
    pub track: TrackSummary,
    pub similarity: f64,
}

pub struct PlaylistEngine {
    dataset: Dataset,
}

impl PlaylistEngine {
    pub fn new(dataset: Dataset) -> Self {
        PlaylistEngine { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn create_mood_playlist(&self, request: &MoodPlaylistRequest<'_>) -> MoodPlaylist {
        let Ok(mood) = request.mood.parse::<Mood>() else {
            debug!("Unknown mood '{}'", request.mood);
            return MoodPlaylist::Tracks(Vec::new());
        };
        let options = MoodFilterOptions {
            genre: request.genre,
            min_popularity: request.min_popularity,
        };
        let filter = MoodFilter::new(&self.dataset);

        match request.duration_minutes.filter(|m| *m > 0.0) {
            None => MoodPlaylist::Tracks(summarize(filter.filter(mood, request.size, &options))),
            Some(target) => {
                let matching = filter.matching(mood, &options);
                if matching.is_empty() {
                    return MoodPlaylist::Tracks(Vec::new());
                }
                let pool_size = request
                    .size
                    .saturating_mul(DURATION_POOL_FACTOR)
                    .max(MIN_DURATION_POOL);
                let pool = sample_fixed(&matching, pool_size);
                match pack(&pool, target) {
                    PackOutcome::EmptyPool => MoodPlaylist::NoDurationPool,
                    PackOutcome::Packed(tracks) => MoodPlaylist::Tracks(summarize(tracks)),
                }
            }
        }
    }

    /// `None` when no track matches the query. A found reference may still
    /// yield an empty list when no other identity is left to rank.
    pub fn find_similar_songs(
        &self,
        song_name: &str,
        artist: Option<&str>,
        count: usize,
    ) -> Option<Vec<SimilarSong>> {
        let reference = self.dataset.find_first(song_name, artist)?;
        let similar = SimilarityRanker::new(&self.dataset)
            .similar_to(reference, count)
            .into_iter()
            .map(|similar| SimilarSong {
                track: TrackSummary::from(similar.track),
                similarity: similar.score,
            })
            .collect();
        Some(similar)
    }

    pub fn analyze_song(&self, song_name: &str, artist: Option<&str>) -> Option<TrackAnalysis> {
        self.dataset
            .find_first(song_name, artist)
            .and_then(|index| self.dataset.get(index))
            .map(TrackAnalysis::from)
    }

    /// Tracks whose genre contains any of `genres`, case-insensitively. An
    /// empty list accepts every track that has a genre. Without a genre
    /// column the whole dataset is sampled.
    pub fn create_genre_playlist(
        &self,
        genres: &[String],
        size: usize,
        diversity: DiversityLevel,
    ) -> Vec<TrackSummary> {
        let tracks: Vec<&Track> = self.dataset.tracks().iter().collect();
        if !self.dataset.columns().genre {
            return summarize(sample_fixed(&tracks, size));
        }

        let filtered: Vec<&Track> = tracks
            .into_iter()
            .filter(|track| {
                track.genre.as_deref().is_some_and(|genre| {
                    genres.is_empty() || genres.iter().any(|g| contains_ignore_case(genre, g))
                })
            })
            .collect();

        if diversity == DiversityLevel::High && filtered.len() > size {
            let vectors: Vec<FeatureVector> = filtered.iter().map(|t| t.normalized).collect();
            let picked = select_diverse(&vectors, size);
            return picked.into_iter().map(|i| TrackSummary::from(filtered[i])).collect();
        }
        summarize(sample_fixed(&filtered, size))
    }

    pub fn dataset_stats(&self) -> DatasetStats {
        DatasetStats::collect(&self.dataset)
    }
}

fn summarize(tracks: Vec<&Track>) -> Vec<TrackSummary> {
    tracks.into_iter().map(TrackSummary::from).collect()
}
