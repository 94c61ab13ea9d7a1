use std::collections::HashSet;

use super::{ArtistTokenizer, DatasetStore, FilterState};
use crate::models::Track;

/// The two subsets derived from one filter state.
///
/// Tracks are identified by their position in the [`DatasetStore`].
/// `primary` honours every active dimension; `date_context` ignores the date
/// range so the release-date histogram keeps showing the whole background
/// distribution while a range is being brushed on it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilteredView {
    primary: Vec<usize>,
    date_context: Vec<usize>,
    selected: HashSet<usize>,
}

impl FilteredView {
    /// Ids passing all four filters, in dataset order
    pub fn primary(&self) -> &[usize] {
        &self.primary
    }

    /// Ids passing cluster, genre and artist filters, in dataset order
    pub fn date_context(&self) -> &[usize] {
        &self.date_context
    }

    /// Constant-time highlight check for renderers
    pub fn is_selected(&self, id: usize) -> bool {
        self.selected.contains(&id)
    }

    pub fn primary_tracks<'a>(&self, store: &'a DatasetStore) -> Vec<&'a Track> {
        resolve(store, &self.primary)
    }

    pub fn date_context_tracks<'a>(&self, store: &'a DatasetStore) -> Vec<&'a Track> {
        resolve(store, &self.date_context)
    }
}

fn resolve<'a>(store: &'a DatasetStore, ids: &[usize]) -> Vec<&'a Track> {
    ids.iter().filter_map(|&id| store.get(id)).collect()
}

/// Filter predicates and the cross-filter evaluation
pub struct FilterEngine;

impl FilterEngine {
    /// No cluster selected accepts every track
    pub fn matches_cluster(track: &Track, state: &FilterState) -> bool {
        state.cluster.is_none_or(|cluster| track.cluster == cluster)
    }

    /// Any selected genre matches; an empty selection accepts every track
    pub fn matches_genres(track: &Track, state: &FilterState) -> bool {
        state.genres.is_empty() || state.genres.contains(&track.genre)
    }

    /// Any credited artist among the selected ones matches
    pub fn matches_artists(track: &Track, state: &FilterState, tokenizer: &ArtistTokenizer) -> bool {
        if state.artists.is_empty() {
            return true;
        }

        tokenizer
            .split(&track.artist_field)
            .iter()
            .any(|artist| state.artists.contains(artist))
    }

    /// Undated tracks never fall inside an active range
    pub fn matches_date_range(track: &Track, state: &FilterState) -> bool {
        let Some(range) = &state.date_range else {
            return true;
        };

        track.release_date.is_some_and(|date| range.contains(date))
    }

    /// Derive both subsets in a single pass over the store
    pub fn evaluate(
        store: &DatasetStore,
        state: &FilterState,
        tokenizer: &ArtistTokenizer,
    ) -> FilteredView {
        let date_context: Vec<usize> = store
            .records()
            .iter()
            .enumerate()
            .filter(|(_, track)| {
                Self::matches_cluster(track, state)
                    && Self::matches_genres(track, state)
                    && Self::matches_artists(track, state, tokenizer)
            })
            .map(|(id, _)| id)
            .collect();

        let primary: Vec<usize> = if state.date_range.is_some() {
            date_context
                .iter()
                .copied()
                .filter(|&id| {
                    store
                        .get(id)
                        .is_some_and(|track| Self::matches_date_range(track, state))
                })
                .collect()
        } else {
            date_context.clone()
        };

        let selected = primary.iter().copied().collect();

        log::debug!(
            "Evaluated filters over {} tracks: primary={}, date_context={}",
            store.len(),
            primary.len(),
            date_context.len()
        );

        FilteredView {
            primary,
            date_context,
            selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossfilter::DateRange;
    use crate::models::AudioFeatures;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_track(
        cluster: u32,
        genre: &str,
        artists: &str,
        release_date: Option<NaiveDate>,
        loudness: f64,
    ) -> Track {
        Track {
            cluster,
            genre: genre.to_string(),
            artist_field: artists.to_string(),
            release_date,
            features: AudioFeatures {
                loudness,
                ..AudioFeatures::default()
            },
            ..Track::default()
        }
    }

    fn create_store() -> DatasetStore {
        DatasetStore::load(vec![
            create_track(0, "pop", "Drake", Some(date(2020, 3, 1)), -5.0),
            create_track(0, "rock", "Tyler, The Creator, Drake", Some(date(2018, 7, 4)), -8.0),
            create_track(1, "pop", "Adele", None, -12.0),
            create_track(1, "rap", "Tyler, The Creator", Some(date(2020, 11, 20)), -3.0),
            create_track(2, "rock", "Queen", Some(date(1995, 1, 1)), -10.0),
        ])
        .unwrap()
    }

    fn tokenizer() -> ArtistTokenizer {
        ArtistTokenizer::new(["Tyler, The Creator"])
    }

    fn year_2020() -> DateRange {
        DateRange::new(date(2020, 1, 1), date(2020, 12, 31)).unwrap()
    }

    #[test]
    fn test_no_filters_selects_everything() {
        let store = create_store();
        let view = FilterEngine::evaluate(&store, &FilterState::default(), &tokenizer());

        assert_eq!(view.primary(), &[0, 1, 2, 3, 4]);
        assert_eq!(view.primary(), view.date_context());
        assert!((0..5).all(|id| view.is_selected(id)));
    }

    #[test]
    fn test_cluster_filter() {
        let store = create_store();
        let state = FilterState::default().set_cluster(Some(1));
        let view = FilterEngine::evaluate(&store, &state, &tokenizer());

        assert_eq!(view.primary(), &[2, 3]);
        assert!(!view.is_selected(0));
    }

    #[test]
    fn test_genres_combine_with_or() {
        let store = create_store();
        let state = FilterState::default().toggle_genre("rap").toggle_genre("rock");
        let view = FilterEngine::evaluate(&store, &state, &tokenizer());

        assert_eq!(view.primary(), &[1, 3, 4]);
    }

    #[test]
    fn test_artists_match_tokenized_credits() {
        let store = create_store();
        let state = FilterState::default().toggle_artist("Tyler, The Creator");
        let view = FilterEngine::evaluate(&store, &state, &tokenizer());
        assert_eq!(view.primary(), &[1, 3]);

        let state = state.toggle_artist("Drake");
        let view = FilterEngine::evaluate(&store, &state, &tokenizer());
        assert_eq!(view.primary(), &[0, 1, 3]);
    }

    #[test]
    fn test_dimensions_combine_with_and() {
        let store = create_store();
        let state = FilterState::default()
            .set_cluster(Some(0))
            .toggle_genre("rock")
            .toggle_artist("Drake");
        let view = FilterEngine::evaluate(&store, &state, &tokenizer());

        assert_eq!(view.primary(), &[1]);
    }

    #[test]
    fn test_date_range_excluded_from_date_context() {
        let store = create_store();
        let state = FilterState::default().set_date_range(Some(year_2020()));
        let view = FilterEngine::evaluate(&store, &state, &tokenizer());

        assert_eq!(view.primary(), &[0, 3]);
        assert_eq!(view.date_context(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_undated_track_only_in_date_context() {
        let store = create_store();
        let state = FilterState::default()
            .set_cluster(Some(1))
            .set_date_range(Some(year_2020()));
        let view = FilterEngine::evaluate(&store, &state, &tokenizer());

        assert!(!view.primary().contains(&2));
        assert!(view.date_context().contains(&2));
        assert!(!view.is_selected(2));
    }

    #[test]
    fn test_primary_is_subset_of_date_context() {
        let store = create_store();
        let states = [
            FilterState::default(),
            FilterState::default().set_date_range(Some(year_2020())),
            FilterState::default()
                .toggle_genre("pop")
                .set_date_range(Some(year_2020())),
            FilterState::default()
                .set_cluster(Some(2))
                .set_date_range(Some(year_2020())),
        ];

        for state in &states {
            let view = FilterEngine::evaluate(&store, state, &tokenizer());
            assert!(view.primary().iter().all(|id| view.date_context().contains(id)));
            if state.date_range.is_none() {
                assert_eq!(view.primary(), view.date_context());
            }
        }
    }

    #[test]
    fn test_resolves_tracks_from_store() {
        let store = create_store();
        let state = FilterState::default().set_cluster(Some(2));
        let view = FilterEngine::evaluate(&store, &state, &tokenizer());

        let tracks = view.primary_tracks(&store);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].artist_field, "Queen");
        assert_eq!(view.date_context_tracks(&store).len(), 1);
    }

    #[test]
    fn test_empty_store_evaluates_to_empty_view() {
        let store = DatasetStore::default();
        let state = FilterState::default().toggle_genre("pop");
        let view = FilterEngine::evaluate(&store, &state, &tokenizer());

        assert!(view.primary().is_empty());
        assert!(view.date_context().is_empty());
    }
}
