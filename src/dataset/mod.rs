//! In-memory track table with its load-time feature normalization.

mod load;
mod normalizer;
mod track;

pub use normalizer::FeatureNormalizer;
pub(crate) use track::contains_ignore_case;
pub use track::{AudioFeature, FeatureVector, Track, FEATURE_COUNT, MISSING_FEATURE_VALUE};

use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Which optional columns the source file carried in its header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnSet {
    pub popularity: bool,
    pub album: bool,
    pub genre: bool,
    pub subgenre: bool,
    pub duration: bool,
}

/// Read-only table of tracks. Normalization statistics are fit once on
/// construction and never recomputed.
#[derive(Debug, Clone)]
pub struct Dataset {
    tracks: Vec<Track>,
    columns: ColumnSet,
    normalizer: FeatureNormalizer,
}

impl Dataset {
    /// Builds a dataset from tracks whose `original` features are set,
    /// fitting the normalizer and filling every `normalized` vector.
    pub fn new(columns: ColumnSet, mut tracks: Vec<Track>) -> Self {
        let normalizer = FeatureNormalizer::fit(tracks.iter().map(|t| &t.original));
        for track in tracks.iter_mut() {
            track.normalized = normalizer.transform(&track.original);
        }
        Dataset {
            tracks,
            columns,
            normalizer,
        }
    }

    pub fn empty() -> Self {
        Dataset::new(ColumnSet::default(), Vec::new())
    }

    /// Loads the table at `path`. Any failure is logged and yields an empty
    /// dataset, which every operation treats as a valid state.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(dataset) => dataset,
            Err(err) => {
                error!("Error loading dataset from {}: {}", path.display(), err);
                Dataset::empty()
            }
        }
    }

    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        info!("Loading dataset from {}...", path.display());
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let table = load::parse_table(reader)?;
        if table.dropped_rows > 0 {
            info!(
                "Dropped {} rows without a track name or artist",
                table.dropped_rows
            );
        }
        let dataset = Dataset::new(table.columns, table.tracks);
        info!("Dataset loaded: {} songs", dataset.len());
        for feature in AudioFeature::ALL {
            debug!(
                "{:?}: mean {:.3}, std {:.3}",
                feature,
                dataset.normalizer().mean(feature),
                dataset.normalizer().std_dev(feature)
            );
        }
        Ok(dataset)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn columns(&self) -> ColumnSet {
        self.columns
    }

    pub fn normalizer(&self) -> &FeatureNormalizer {
        &self.normalizer
    }

    /// Row index of the first track (in load order) matching the query.
    pub fn find_first(&self, name: &str, artist: Option<&str>) -> Option<usize> {
        self.tracks
            .iter()
            .position(|track| track.matches_query(name, artist))
    }
}
