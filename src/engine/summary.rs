use crate::dataset::{AudioFeature, Track};
use serde::Serialize;

/// Caller-facing view of a track. Feature values are the original ones.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackSummary {
    pub name: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub subgenre: Option<String>,
    pub popularity: Option<u32>,
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64,
    pub acousticness: f64,
    pub tempo: f64,
    pub duration_minutes: f64,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        TrackSummary {
            name: track.name.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            genre: track.genre.clone(),
            subgenre: track.subgenre.clone(),
            popularity: track.popularity,
            energy: track.original.get(AudioFeature::Energy),
            valence: track.original.get(AudioFeature::Valence),
            danceability: track.original.get(AudioFeature::Danceability),
            acousticness: track.original.get(AudioFeature::Acousticness),
            tempo: track.original.get(AudioFeature::Tempo),
            duration_minutes: track.duration_minutes().unwrap_or(0.0),
        }
    }
}

/// Full record of a single track with denormalized features.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackAnalysis {
    pub id: Option<String>,
    pub name: String,
    pub artist: String,
    pub album: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub subgenre: Option<String>,
    pub popularity: Option<u32>,
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub speechiness: f64,
    pub liveness: f64,
    pub tempo: f64,
    pub key: Option<i32>,
    pub mode: Option<i32>,
    pub loudness: Option<f64>,
    pub duration_seconds: Option<f64>,
}

impl From<&Track> for TrackAnalysis {
    fn from(track: &Track) -> Self {
        let feature = |f: AudioFeature| track.original.get(f);
        TrackAnalysis {
            id: track.id.clone(),
            name: track.name.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            release_date: track.release_date.clone(),
            genre: track.genre.clone(),
            subgenre: track.subgenre.clone(),
            popularity: track.popularity,
            energy: feature(AudioFeature::Energy),
            valence: feature(AudioFeature::Valence),
            danceability: feature(AudioFeature::Danceability),
            acousticness: feature(AudioFeature::Acousticness),
            instrumentalness: feature(AudioFeature::Instrumentalness),
            speechiness: feature(AudioFeature::Speechiness),
            liveness: feature(AudioFeature::Liveness),
            tempo: feature(AudioFeature::Tempo),
            key: track.key,
            mode: track.mode,
            loudness: track.loudness,
            duration_seconds: track.duration_ms.map(|ms| ms as f64 / 1000.0),
        }
    }
}
