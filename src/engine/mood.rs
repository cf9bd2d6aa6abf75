//! Mood profiles and the filter that applies them.

use super::sampling::sample_fixed;
use crate::dataset::{contains_ignore_case, AudioFeature, Dataset, Track};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Calm,
    Party,
    Chill,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Min,
    Max,
}

/// A threshold on one normalized feature.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Predicate {
    pub feature: AudioFeature,
    pub bound: Bound,
    pub threshold: f64,
}

const fn at_least(feature: AudioFeature, threshold: f64) -> Predicate {
    Predicate {
        feature,
        bound: Bound::Min,
        threshold,
    }
}

const fn at_most(feature: AudioFeature, threshold: f64) -> Predicate {
    Predicate {
        feature,
        bound: Bound::Max,
        threshold,
    }
}

const HAPPY: &[Predicate] = &[at_least(AudioFeature::Valence, 0.2)];
const SAD: &[Predicate] = &[at_most(AudioFeature::Valence, -0.2)];
const ENERGETIC: &[Predicate] = &[at_least(AudioFeature::Energy, 0.5), at_least(AudioFeature::Tempo, 0.2)];
const CALM: &[Predicate] = &[at_most(AudioFeature::Energy, -0.3)];
const PARTY: &[Predicate] = &[
    at_least(AudioFeature::Danceability, 0.3),
    at_least(AudioFeature::Energy, 0.3),
    at_least(AudioFeature::Valence, 0.2),
];
const CHILL: &[Predicate] = &[
    at_most(AudioFeature::Energy, 0.0),
    at_least(AudioFeature::Valence, -0.3),
    at_most(AudioFeature::Valence, 0.3),
];

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Calm,
        Mood::Party,
        Mood::Chill,
    ];

    pub fn predicates(&self) -> &'static [Predicate] {
        match self {
            Mood::Happy => HAPPY,
            Mood::Sad => SAD,
            Mood::Energetic => ENERGETIC,
            Mood::Calm => CALM,
            Mood::Party => PARTY,
            Mood::Chill => CHILL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
            Mood::Party => "party",
            Mood::Chill => "chill",
        }
    }

    /// True when every predicate holds on the track's normalized features.
    pub fn accepts(&self, track: &Track) -> bool {
        self.predicates().iter().all(|p| p.accepts(track))
    }
}

impl Predicate {
    pub fn accepts(&self, track: &Track) -> bool {
        let value = track.normalized.get(self.feature);
        match self.bound {
            Bound::Min => value >= self.threshold,
            Bound::Max => value <= self.threshold,
        }
    }
}

impl FromStr for Mood {
    type Err = ();

    /// Mood names are matched exactly, lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional narrowing applied before the mood predicates.
#[derive(Clone, Debug, Default)]
pub struct MoodFilterOptions<'q> {
    pub genre: Option<&'q str>,
    pub min_popularity: u32,
}

pub struct MoodFilter<'d> {
    dataset: &'d Dataset,
}

impl<'d> MoodFilter<'d> {
    pub fn new(dataset: &'d Dataset) -> Self {
        MoodFilter { dataset }
    }

    /// All tracks passing popularity, genre and mood predicates, in row order.
    pub fn matching(&self, mood: Mood, options: &MoodFilterOptions<'_>) -> Vec<&'d Track> {
        let columns = self.dataset.columns();
        self.dataset
            .tracks()
            .iter()
            .filter(|track| {
                !columns.popularity
                    || track
                        .popularity
                        .is_some_and(|p| p >= options.min_popularity)
            })
            .filter(|track| match (options.genre, columns.genre) {
                (Some(genre), true) => track
                    .genre
                    .as_deref()
                    .is_some_and(|g| contains_ignore_case(g, genre)),
                _ => true,
            })
            .filter(|track| mood.accepts(track))
            .collect()
    }

    /// Matching tracks, reduced to `size` by fixed-seed sampling.
    pub fn filter(
        &self,
        mood: Mood,
        size: usize,
        options: &MoodFilterOptions<'_>,
    ) -> Vec<&'d Track> {
        sample_fixed(&self.matching(mood, options), size)
    }
}
