//! Descriptive statistics over the whole dataset.

use crate::dataset::{AudioFeature, Dataset, Track};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

const TOP_GENRES: usize = 10;
const TOP_SUBGENRES: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DatasetStats {
    pub total_songs: usize,
    pub unique_artists: usize,
    pub unique_albums: usize,
    pub popularity: Option<ValueRange>,
    pub avg_energy: Option<f64>,
    pub avg_valence: Option<f64>,
    pub avg_danceability: Option<f64>,
    pub tempo: Option<ValueRange>,
    pub avg_duration_minutes: Option<f64>,
    pub top_genres: Vec<(String, usize)>,
    pub top_subgenres: Vec<(String, usize)>,
}

impl DatasetStats {
    /// Recomputes everything from scratch on each call. Audio feature
    /// figures use the original, unnormalized values.
    pub fn collect(dataset: &Dataset) -> Self {
        let tracks = dataset.tracks();
        let columns = dataset.columns();

        let unique_artists = tracks
            .iter()
            .map(|t| t.artist.as_str())
            .collect::<HashSet<_>>()
            .len();
        let unique_albums = tracks
            .iter()
            .filter_map(|t| t.album.as_deref())
            .collect::<HashSet<_>>()
            .len();

        let popularity = if columns.popularity {
            value_range(tracks.iter().filter_map(|t| t.popularity.map(f64::from)))
        } else {
            None
        };

        let feature_mean = |feature: AudioFeature| {
            mean(tracks.iter().map(|t| t.original.get(feature)))
        };

        let avg_duration_minutes = if columns.duration {
            mean(tracks.iter().filter_map(Track::duration_minutes))
        } else {
            None
        };

        let top_genres = if columns.genre {
            top_counts(tracks.iter().filter_map(|t| t.genre.as_deref()), TOP_GENRES)
        } else {
            Vec::new()
        };
        let top_subgenres = if columns.subgenre {
            top_counts(
                tracks.iter().filter_map(|t| t.subgenre.as_deref()),
                TOP_SUBGENRES,
            )
        } else {
            Vec::new()
        };

        DatasetStats {
            total_songs: tracks.len(),
            unique_artists,
            unique_albums,
            popularity,
            avg_energy: feature_mean(AudioFeature::Energy),
            avg_valence: feature_mean(AudioFeature::Valence),
            avg_danceability: feature_mean(AudioFeature::Danceability),
            tempo: value_range(tracks.iter().map(|t| t.original.get(AudioFeature::Tempo))),
            avg_duration_minutes,
            top_genres,
            top_subgenres,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn value_range(values: impl Iterator<Item = f64>) -> Option<ValueRange> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }
    (count > 0).then(|| ValueRange {
        min,
        mean: sum / count as f64,
        max,
    })
}

/// Most frequent values, highest count first. Equal counts keep the order
/// in which the values were first seen.
fn top_counts<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(String, usize)> {
    let mut order: Vec<&'a str> = Vec::new();
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value).or_insert_with(|| {
            order.push(value);
            0
        });
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|value| (value.to_string(), counts[value]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}
