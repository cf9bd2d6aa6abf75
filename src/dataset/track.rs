use serde::{Deserialize, Serialize};

/// Value used for any audio feature cell that is absent or unparseable.
pub const MISSING_FEATURE_VALUE: f64 = 0.5;

pub const FEATURE_COUNT: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFeature {
    Danceability = 0,
    Energy = 1,
    Valence = 2,
    Acousticness = 3,
    Instrumentalness = 4,
    Liveness = 5,
    Speechiness = 6,
    Tempo = 7,
}

impl AudioFeature {
    pub const ALL: [AudioFeature; FEATURE_COUNT] = [
        AudioFeature::Danceability,
        AudioFeature::Energy,
        AudioFeature::Valence,
        AudioFeature::Acousticness,
        AudioFeature::Instrumentalness,
        AudioFeature::Liveness,
        AudioFeature::Speechiness,
        AudioFeature::Tempo,
    ];

    /// Header name of the feature in the source file.
    pub fn column(&self) -> &'static str {
        match self {
            AudioFeature::Danceability => "danceability",
            AudioFeature::Energy => "energy",
            AudioFeature::Valence => "valence",
            AudioFeature::Acousticness => "acousticness",
            AudioFeature::Instrumentalness => "instrumentalness",
            AudioFeature::Liveness => "liveness",
            AudioFeature::Speechiness => "speechiness",
            AudioFeature::Tempo => "tempo",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// The eight audio features of a track, indexed by [`AudioFeature`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn filled(value: f64) -> Self {
        FeatureVector([value; FEATURE_COUNT])
    }

    pub fn get(&self, feature: AudioFeature) -> f64 {
        self.0[feature.index()]
    }

    pub fn set(&mut self, feature: AudioFeature, value: f64) {
        self.0[feature.index()] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        FeatureVector::filled(MISSING_FEATURE_VALUE)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub artist: String,
    pub album: Option<String>,
    pub album_id: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub subgenre: Option<String>,
    pub popularity: Option<u32>,
    pub duration_ms: Option<u64>,
    pub key: Option<i32>,
    pub mode: Option<i32>,
    pub loudness: Option<f64>,

    /// Feature values as loaded, missing cells already defaulted.
    pub original: FeatureVector,

    /// Standardized features. Filled in by the dataset at load time.
    pub normalized: FeatureVector,
}

impl Track {
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Track {
            id: None,
            name: name.into(),
            artist: artist.into(),
            album: None,
            album_id: None,
            release_date: None,
            genre: None,
            subgenre: None,
            popularity: None,
            duration_ms: None,
            key: None,
            mode: None,
            loudness: None,
            original: FeatureVector::default(),
            normalized: FeatureVector::filled(0.0),
        }
    }

    pub fn duration_minutes(&self) -> Option<f64> {
        self.duration_ms.map(|ms| ms as f64 / 1000.0 / 60.0)
    }

    /// Case-insensitive substring match on name and, if given, artist.
    pub fn matches_query(&self, name: &str, artist: Option<&str>) -> bool {
        if !contains_ignore_case(&self.name, name) {
            return false;
        }
        match artist {
            Some(artist) => contains_ignore_case(&self.artist, artist),
            None => true,
        }
    }

    /// Whether both tracks share the same (name, artist) pair, ignoring case.
    pub fn same_identity(&self, other: &Track) -> bool {
        self.name.to_lowercase() == other.name.to_lowercase()
            && self.artist.to_lowercase() == other.artist.to_lowercase()
    }

    pub fn identity_key(&self) -> (String, String) {
        (self.name.to_lowercase(), self.artist.to_lowercase())
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
