use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CrossfilterError, SortDirection};
use crate::models::AudioFeature;

/// Settings for one cross-filter engine instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Artist names that legitimately contain ", " and must survive tokenizing
    pub artist_exceptions: Vec<String>,
    /// First month of the release-date histogram, whatever the data holds
    pub histogram_start: NaiveDate,
    /// Length of the genre, artist and track rankings
    pub top_n: usize,
    /// Whether genre and artist rankings list the highest or lowest averages
    pub ranking: SortDirection,
    /// Features averaged for the bar chart, in display order
    pub features: Vec<AudioFeature>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            artist_exceptions: vec!["Tyler, The Creator".to_string()],
            histogram_start: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default(),
            top_n: 10,
            ranking: SortDirection::Descending,
            features: AudioFeature::ALL.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Load engine settings from a JSON file; absent keys keep their defaults
    pub fn load_from_file(path: &str) -> Result<Self, CrossfilterError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CrossfilterError::Settings(format!("{path}: {e}")))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CrossfilterError> {
        serde_json::from_str(content).map_err(|e| CrossfilterError::Settings(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let config = EngineConfig::from_json(r#"{ "top_n": 5 }"#).unwrap();

        assert_eq!(config.top_n, 5);
        assert_eq!(config.artist_exceptions, vec!["Tyler, The Creator".to_string()]);
        assert_eq!(config.histogram_start, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        assert_eq!(config.features.len(), 9);
        assert_eq!(config.ranking, SortDirection::Descending);
    }

    #[test]
    fn test_settings_parse_feature_names_and_dates() {
        let json = r#"{
            "artist_exceptions": ["Earth, Wind & Fire"],
            "histogram_start": "2000-06-01",
            "ranking": "ascending",
            "features": ["energy", "valence"]
        }"#;
        let config = EngineConfig::from_json(json).unwrap();

        assert_eq!(config.artist_exceptions, vec!["Earth, Wind & Fire".to_string()]);
        assert_eq!(config.histogram_start, NaiveDate::from_ymd_opt(2000, 6, 1).unwrap());
        assert_eq!(config.features, vec![AudioFeature::Energy, AudioFeature::Valence]);
        assert_eq!(config.ranking, SortDirection::Ascending);
    }

    #[test]
    fn test_malformed_settings_are_reported() {
        let err = EngineConfig::from_json("{ top_n: ").unwrap_err();
        assert!(matches!(err, CrossfilterError::Settings(_)));
    }

    #[test]
    fn test_missing_settings_file_is_reported() {
        let err = EngineConfig::load_from_file("/nonexistent/crossfilter.json").unwrap_err();
        assert!(matches!(err, CrossfilterError::Settings(_)));
    }
}
