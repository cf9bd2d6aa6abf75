//! Cosine-similarity ranking over normalized feature vectors.

use crate::dataset::{Dataset, Track};
use std::collections::HashSet;

/// Cosine similarity of two equal-length vectors.
///
/// Returns 0.0 when the lengths differ, the vectors are empty, or either
/// has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimilarTrack<'d> {
    pub track: &'d Track,
    pub score: f64,
}

pub struct SimilarityRanker<'d> {
    dataset: &'d Dataset,
}

impl<'d> SimilarityRanker<'d> {
    pub fn new(dataset: &'d Dataset) -> Self {
        SimilarityRanker { dataset }
    }

    /// Every other row scored against `reference`, best first. Equal scores
    /// keep row order.
    pub fn rank(&self, reference: usize) -> Vec<(usize, f64)> {
        let Some(reference_track) = self.dataset.get(reference) else {
            return Vec::new();
        };
        let target = reference_track.normalized.as_slice();

        let mut scored: Vec<(usize, f64)> = self
            .dataset
            .tracks()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != reference)
            .map(|(i, track)| (i, cosine_similarity(target, track.normalized.as_slice())))
            .collect();

        // sort_by is stable, so ties stay in row order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }

    /// Tracks most similar to the row at `reference`.
    ///
    /// Candidates sharing the reference's (name, artist), or repeating a pair
    /// already collected, are skipped until `count` unique results are found.
    pub fn similar_to(&self, reference: usize, count: usize) -> Vec<SimilarTrack<'d>> {
        let dataset: &'d Dataset = self.dataset;
        if reference >= dataset.len() {
            return Vec::new();
        }
        let reference_track = &dataset.tracks()[reference];

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut results = Vec::with_capacity(count);

        for (index, score) in self.rank(reference) {
            if results.len() >= count {
                break;
            }
            let track = &dataset.tracks()[index];
            if track.same_identity(reference_track) {
                continue;
            }
            if !seen.insert(track.identity_key()) {
                continue;
            }
            results.push(SimilarTrack { track, score });
        }

        results
    }
}
