//! CSV parsing of the track table.

use super::track::{AudioFeature, Track, MISSING_FEATURE_VALUE};
use super::{ColumnSet, DatasetError};
use csv::StringRecord;
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

const NAME_COLUMN: &str = "track_name";
const ARTIST_COLUMN: &str = "track_artist";

/// Rows that survived cleaning, plus how many were dropped.
pub(super) struct ParsedTable {
    pub columns: ColumnSet,
    pub tracks: Vec<Track>,
    pub dropped_rows: usize,
}

struct HeaderIndex(HashMap<String, usize>);

impl HeaderIndex {
    fn new(headers: &StringRecord) -> Self {
        let mut map = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            // First occurrence wins on duplicated headers.
            map.entry(header.trim().to_string()).or_insert(i);
        }
        HeaderIndex(map)
    }

    fn has(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    fn cell<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        let index = *self.0.get(column)?;
        record
            .get(index)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn text(&self, record: &StringRecord, column: &str) -> Option<String> {
        self.cell(record, column).map(str::to_string)
    }

    fn real(&self, record: &StringRecord, column: &str) -> Option<f64> {
        self.cell(record, column)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    fn integer(&self, record: &StringRecord, column: &str) -> Option<i64> {
        self.real(record, column).map(|v| v.round() as i64)
    }
}

pub(super) fn parse_table<R: Read>(reader: R) -> Result<ParsedTable, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = HeaderIndex::new(csv_reader.headers()?);
    for required in [NAME_COLUMN, ARTIST_COLUMN] {
        if !headers.has(required) {
            return Err(DatasetError::MissingColumn(required.to_string()));
        }
    }

    let columns = ColumnSet {
        popularity: headers.has("track_popularity"),
        album: headers.has("track_album_name"),
        genre: headers.has("playlist_genre"),
        subgenre: headers.has("playlist_subgenre"),
        duration: headers.has("duration_ms"),
    };

    let mut tracks = Vec::new();
    let mut dropped_rows = 0;

    for record in csv_reader.records() {
        let record = record?;
        match parse_track(&headers, &record) {
            Some(track) => tracks.push(track),
            None => {
                dropped_rows += 1;
                debug!("Dropping row {:?}: missing name or artist", record.position());
            }
        }
    }

    Ok(ParsedTable {
        columns,
        tracks,
        dropped_rows,
    })
}

fn parse_track(headers: &HeaderIndex, record: &StringRecord) -> Option<Track> {
    let name = headers.text(record, NAME_COLUMN)?;
    let artist = headers.text(record, ARTIST_COLUMN)?;

    let mut track = Track::new(name, artist);
    track.id = headers.text(record, "track_id");
    track.album = headers.text(record, "track_album_name");
    track.album_id = headers.text(record, "track_album_id");
    track.release_date = headers.text(record, "track_album_release_date");
    track.genre = headers.text(record, "playlist_genre");
    track.subgenre = headers.text(record, "playlist_subgenre");
    track.popularity = headers
        .integer(record, "track_popularity")
        .and_then(|v| u32::try_from(v).ok());
    track.duration_ms = headers
        .integer(record, "duration_ms")
        .and_then(|v| u64::try_from(v).ok());
    track.key = headers
        .integer(record, "key")
        .and_then(|v| i32::try_from(v).ok());
    track.mode = headers
        .integer(record, "mode")
        .and_then(|v| i32::try_from(v).ok());
    track.loudness = headers.real(record, "loudness");

    for feature in AudioFeature::ALL {
        let value = headers
            .real(record, feature.column())
            .unwrap_or(MISSING_FEATURE_VALUE);
        track.original.set(feature, value);
    }

    Some(track)
}
