use std::collections::HashSet;

use super::{ArtistTokenizer, DatasetStore};
use crate::models::ClusterId;

/// Selectable genre and artist values, in first-occurrence order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub genres: Vec<String>,
    pub artists: Vec<String>,
}

impl FilterOptions {
    /// Distinct genres and artists among the tracks of `cluster`, or of the
    /// whole dataset when no cluster is selected
    pub fn collect(store: &DatasetStore, tokenizer: &ArtistTokenizer, cluster: Option<ClusterId>) -> Self {
        let mut options = Self::default();
        let mut seen_genres = HashSet::new();
        let mut seen_artists = HashSet::new();

        let tracks = store
            .records()
            .iter()
            .filter(|t| cluster.is_none_or(|c| t.cluster == c));

        for track in tracks {
            if seen_genres.insert(track.genre.as_str()) {
                options.genres.push(track.genre.clone());
            }
            for artist in tokenizer.split(&track.artist_field) {
                if seen_artists.insert(artist.clone()) {
                    options.artists.push(artist);
                }
            }
        }

        options
    }

    /// Case-insensitive substring narrowing of both lists
    pub fn search(&self, query: &str) -> Self {
        let needle = query.to_lowercase();
        let keep = |values: &[String]| -> Vec<String> {
            values
                .iter()
                .filter(|v| v.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        };

        Self {
            genres: keep(&self.genres),
            artists: keep(&self.artists),
        }
    }
}
