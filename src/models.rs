use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cluster id assigned by the upstream PCA/k-means pipeline
pub type ClusterId = u32;

/// One track as handed over by ingestion, already typed.
///
/// `loudness` arrives raw (dB) and is rescaled to [0, 1] when the dataset is
/// loaded; every other audio feature is expected to already lie in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub pca_x: f64,
    pub pca_y: f64,
    pub cluster: ClusterId,
    pub features: AudioFeatures,
    pub release_date: Option<NaiveDate>,
    pub genre: String,
    /// Raw artist credit, possibly several names joined with ", "
    pub artist_field: String,
    pub popularity: Option<f64>,
    pub track_name: String,
}

/// The nine audio features shown in the feature-average bar chart
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AudioFeatures {
    pub energy: f64,
    pub danceability: f64,
    pub loudness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub speechiness: f64,
    pub instrumentalness: f64,
    pub mode: f64,
    pub acousticness: f64,
}

/// Names one field of [`AudioFeatures`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFeature {
    Energy,
    Danceability,
    Loudness,
    Liveness,
    Valence,
    Speechiness,
    Instrumentalness,
    Mode,
    Acousticness,
}

impl AudioFeature {
    /// All features, in the order the dashboard lays out its bars
    pub const ALL: [AudioFeature; 9] = [
        AudioFeature::Energy,
        AudioFeature::Danceability,
        AudioFeature::Loudness,
        AudioFeature::Liveness,
        AudioFeature::Valence,
        AudioFeature::Speechiness,
        AudioFeature::Instrumentalness,
        AudioFeature::Mode,
        AudioFeature::Acousticness,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AudioFeature::Energy => "energy",
            AudioFeature::Danceability => "danceability",
            AudioFeature::Loudness => "loudness",
            AudioFeature::Liveness => "liveness",
            AudioFeature::Valence => "valence",
            AudioFeature::Speechiness => "speechiness",
            AudioFeature::Instrumentalness => "instrumentalness",
            AudioFeature::Mode => "mode",
            AudioFeature::Acousticness => "acousticness",
        }
    }

    /// Read this feature's value from a track
    pub fn value(&self, track: &Track) -> f64 {
        self.read(&track.features)
    }

    pub fn read(&self, f: &AudioFeatures) -> f64 {
        match self {
            AudioFeature::Energy => f.energy,
            AudioFeature::Danceability => f.danceability,
            AudioFeature::Loudness => f.loudness,
            AudioFeature::Liveness => f.liveness,
            AudioFeature::Valence => f.valence,
            AudioFeature::Speechiness => f.speechiness,
            AudioFeature::Instrumentalness => f.instrumentalness,
            AudioFeature::Mode => f.mode,
            AudioFeature::Acousticness => f.acousticness,
        }
    }
}

impl std::fmt::Display for AudioFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for Track {
    fn default() -> Self {
        Track {
            pca_x: 0.0,
            pca_y: 0.0,
            cluster: 0,
            features: AudioFeatures::default(),
            release_date: None,
            genre: String::new(),
            artist_field: String::new(),
            popularity: None,
            track_name: "Unknown".to_string(),
        }
    }
}
