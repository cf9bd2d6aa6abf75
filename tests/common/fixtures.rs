//! Test fixture creation
//!
//! Writes a small track table to a temporary directory.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str = "track_id,track_name,track_artist,track_popularity,track_album_id,\
track_album_name,track_album_release_date,playlist_genre,playlist_subgenre,danceability,\
energy,key,loudness,mode,speechiness,acousticness,instrumentalness,liveness,valence,tempo,\
duration_ms";

const ROWS: &[&str] = &[
    "t01,Sunny Day,The Brights,80,a1,Bright Album,2020-01-10,pop,dance pop,0.80,0.82,5,-5.1,1,0.05,0.10,0.00,0.12,0.91,124.0,180000",
    "t02,Rainy Night,Gloom Co,42,a2,Dark Album,2019-05-05,rock,hard rock,0.31,0.35,2,-9.8,0,0.04,0.62,0.10,0.11,0.12,82.0,240000",
    "t03,Party Starter,DJ Loud,91,a3,Club Hits,2021-07-01,edm,electro house,0.93,0.95,7,-3.2,1,0.09,0.01,0.45,0.31,0.84,128.0,200000",
    "t04,Quiet Morning,Soft Keys,28,a4,Calm Waters,2018-03-03,latin,tropical,0.42,0.08,0,-21.0,1,0.03,0.91,0.82,0.09,0.41,70.0,300000",
    "t05,Sunny Day,The Brights,65,a5,Bright Album (Remaster),2022-01-10,pop,dance pop,0.79,0.81,5,-4.9,1,0.05,0.11,0.00,0.12,0.90,124.0,181000",
    "t06,Sunny Side,Other Band,55,a6,Side Roads,2017-06-06,pop,indie poptimism,0.70,0.74,9,-6.0,1,0.06,0.20,0.01,0.15,0.80,118.0,210000",
    "t07,Orphan Row,,50,a7,Nowhere,2016-01-01,rap,trap,0.5,0.5,1,-7.0,1,0.2,0.2,0.0,0.2,0.5,100.0,200000",
    "t08,Slow Burn,Gloom Co,35,a2,Dark Album,2019-05-05,rock,classic rock,0.35,0.30,4,-11.0,0,0.04,0.55,0.20,0.10,0.18,76.0,260000",
    "t09,Street Rhymes,MC Fast,72,a8,Block Party,2020-11-11,rap,trap,0.85,0.70,11,-5.5,0,0.35,0.05,0.00,0.20,0.60,140.0,190000",
    "t10,Endless Jam,Loop Band,47,a9,Live Set,2015-02-02,r&b,new jack swing,0.76,0.88,6,-4.0,1,0.07,0.02,0.70,0.60,0.55,126.0,",
    "t11,Late Lounge,Soft Keys,33,a4,Calm Waters,2018-03-03,latin,reggaeton,0.55,0.25,3,-15.0,0,0.05,0.70,0.30,0.10,0.35,95.0,230000",
    "t12,Festival Anthem,DJ Loud,88,a3,Club Hits,2021-07-01,edm,big room,0.88,,8,-2.5,1,0.08,0.03,0.20,0.40,0.78,130.0,215000",
];

/// Creates a temporary CSV with 12 rows, 11 of which load.
/// Returns (temp_dir, csv_path).
pub fn create_test_dataset() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let path = dir.path().join("songs.csv");

    let mut content = String::from(HEADER);
    content.push('\n');
    for row in ROWS {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&path, content)?;

    Ok((dir, path))
}

/// A path inside a fresh temp dir that does not exist.
pub fn missing_dataset_path() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let path = dir.path().join("absent.csv");
    Ok((dir, path))
}
