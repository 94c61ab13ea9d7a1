use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

use crate::models::{AudioFeature, AudioFeatures, ClusterId, Track};

/// Anything that can hand over the typed track collection once at startup
#[cfg_attr(test, mockall::automock)]
pub trait TrackSource {
    fn load(&self) -> Result<Vec<Track>>;
}

/// Reads the clustered PCA export (one row per track)
pub struct CsvTrackSource {
    path: PathBuf,
}

impl CsvTrackSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TrackSource for CsvTrackSource {
    fn load(&self) -> Result<Vec<Track>> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("opening track CSV {}", self.path.display()))?;
        let tracks = parse_tracks(file)
            .with_context(|| format!("reading track CSV {}", self.path.display()))?;
        log::info!("Read {} tracks from {}", tracks.len(), self.path.display());
        Ok(tracks)
    }
}

/// Row layout of the export; extra columns are ignored
#[derive(Debug, Deserialize)]
struct CsvRow {
    pca_x: f64,
    pca_y: f64,
    cluster: ClusterId,
    loudness: f64,
    energy: f64,
    danceability: f64,
    liveness: f64,
    valence: f64,
    speechiness: f64,
    instrumentalness: f64,
    mode: f64,
    acousticness: f64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    track_album_release_date: Option<String>,
    #[serde(default)]
    playlist_genre: String,
    #[serde(default)]
    track_artist: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    track_popularity: Option<f64>,
    #[serde(default)]
    track_name: String,
}

impl CsvRow {
    /// `line` is the 1-based line in the file, header included
    fn into_track(self, line: usize) -> Result<Track> {
        let features = AudioFeatures {
            energy: self.energy,
            danceability: self.danceability,
            loudness: self.loudness,
            liveness: self.liveness,
            valence: self.valence,
            speechiness: self.speechiness,
            instrumentalness: self.instrumentalness,
            mode: self.mode,
            acousticness: self.acousticness,
        };
        if let Some(feature) = AudioFeature::ALL
            .iter()
            .find(|f| !f.read(&features).is_finite())
        {
            bail!("Line {line}: {feature} is not a finite number");
        }
        if !self.pca_x.is_finite() || !self.pca_y.is_finite() {
            bail!("Line {line}: PCA coordinates are not finite");
        }

        let release_date = self.track_album_release_date.as_deref().and_then(|raw| {
            let parsed = parse_release_date(raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                log::warn!("Line {line}: unparseable release date '{raw}', treating as unknown");
            }
            parsed
        });

        Ok(Track {
            pca_x: self.pca_x,
            pca_y: self.pca_y,
            cluster: self.cluster,
            features,
            release_date,
            genre: self.playlist_genre,
            artist_field: self.track_artist,
            popularity: self.track_popularity.filter(|p| p.is_finite()),
            track_name: self.track_name,
        })
    }
}

/// Parse every row; a row with malformed or non-finite numeric features is
/// rejected
pub fn parse_tracks<R: Read>(reader: R) -> Result<Vec<Track>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut tracks = Vec::new();

    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1
        let line = row_no + 2;
        let row = result.with_context(|| format!("CSV line {line}"))?;
        tracks.push(row.into_track(line)?);
    }

    Ok(tracks)
}

/// Album release dates come at day, month or year precision
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(&format!("{raw}-01-01"), "%Y-%m-%d").ok())
}
