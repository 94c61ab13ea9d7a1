use std::collections::BTreeMap;

use crate::crossfilter::{Aggregates, FilteredView, ViewNotifier};
use crate::models::{AudioFeature, ClusterId, Track};

/// Features summarised on the headline line under the track count
const HEADLINE_FEATURES: [AudioFeature; 4] = [
    AudioFeature::Danceability,
    AudioFeature::Energy,
    AudioFeature::Valence,
    AudioFeature::Loudness,
];

/// How many points of one cluster the scatter plot draws at full opacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterHighlight {
    pub cluster: ClusterId,
    pub highlighted: usize,
    pub dimmed: usize,
}

/// Split every track of the dataset into highlighted or dimmed, per cluster
pub fn highlight_by_cluster(dataset: &[Track], view: &FilteredView) -> Vec<ClusterHighlight> {
    let mut counts: BTreeMap<ClusterId, (usize, usize)> = BTreeMap::new();
    for (id, track) in dataset.iter().enumerate() {
        let entry = counts.entry(track.cluster).or_default();
        if view.is_selected(id) {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }
    counts
        .into_iter()
        .map(|(cluster, (highlighted, dimmed))| ClusterHighlight {
            cluster,
            highlighted,
            dimmed,
        })
        .collect()
}

/// Text renderer for the terminal: prints a summary of every view update
pub struct ConsoleNotifier {
    quiet: bool,
    json: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool, json: bool) -> Self {
        Self { quiet, json }
    }
}

impl ViewNotifier for ConsoleNotifier {
    fn on_primary_update(&mut self, records: &[&Track]) {
        if self.quiet {
            return;
        }
        println!("\nSelected {} tracks", records.len());
        for track in records.iter().take(5) {
            println!(
                "  - \"{}\" by {} [{}] cluster {}",
                track.track_name, track.artist_field, track.genre, track.cluster
            );
        }
        if records.len() > 5 {
            println!("  ... and {} more", records.len() - 5);
        }
    }

    fn on_date_context_update(&mut self, records: &[&Track]) {
        if self.quiet {
            return;
        }
        let dates = records.iter().filter_map(|t| t.release_date);
        let span = dates.clone().min().zip(dates.max());
        match span {
            Some((first, last)) => println!(
                "Date selector background: {} tracks released {first} .. {last}",
                records.len()
            ),
            None => println!("Date selector background: {} tracks, none dated", records.len()),
        }
    }

    fn on_aggregates_update(&mut self, aggregates: &Aggregates) {
        if self.json {
            match serde_json::to_string_pretty(aggregates) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to serialize aggregates: {e}"),
            }
            return;
        }

        println!("\n=== {} TRACKS ===", aggregates.track_count);
        if self.quiet {
            return;
        }

        let headline: Vec<String> = HEADLINE_FEATURES
            .iter()
            .filter_map(|&f| aggregates.feature_mean(f).map(|mean| format!("{f} {mean:.2}")))
            .collect();
        if !headline.is_empty() {
            println!("{}", headline.join(" | "));
        }

        println!("Feature averages:");
        for avg in &aggregates.feature_averages {
            println!("   {:<17} {:.2}", avg.feature.name(), avg.mean);
        }

        if !aggregates.top_genres.is_empty() {
            let genres: Vec<String> = aggregates
                .top_genres
                .iter()
                .map(|g| format!("{} ({:.1})", g.key, g.average))
                .collect();
            println!("Top genres by popularity: {}", genres.join(", "));
        }

        if !aggregates.top_artists.is_empty() {
            let artists: Vec<String> = aggregates
                .top_artists
                .iter()
                .map(|a| format!("{} ({:.1})", a.key, a.average))
                .collect();
            println!("Top artists by popularity: {}", artists.join(", "));
        }

        if !aggregates.top_tracks.is_empty() {
            println!("Top tracks:");
            for (i, track) in aggregates.top_tracks.iter().enumerate() {
                let popularity = track
                    .popularity
                    .map(|p| format!("{p:.0}"))
                    .unwrap_or_else(|| "?".to_string());
                println!("   {}. \"{}\" by {} ({popularity})", i + 1, track.track_name, track.artists);
            }
        }

        let busiest = aggregates.histogram.iter().max_by_key(|bin| bin.count);
        if let Some(bin) = busiest.filter(|bin| bin.count > 0) {
            println!(
                "Release histogram: {} monthly bins, busiest {} ({} tracks)",
                aggregates.histogram.len(),
                bin.start.format("%Y-%m"),
                bin.count
            );
        }
    }

    fn on_reset(&mut self) {
        if !self.quiet {
            println!("\nAll filters cleared");
        }
    }

    fn on_highlight_update(&mut self, dataset: &[Track], view: &FilteredView) {
        if self.quiet {
            return;
        }
        println!("Scatter plot:");
        for cluster in highlight_by_cluster(dataset, view) {
            println!(
                "   cluster {:<3} {} highlighted, {} dimmed",
                cluster.cluster, cluster.highlighted, cluster.dimmed
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossfilter::{ArtistTokenizer, DatasetStore, FilterEngine, FilterState};
    use crate::models::AudioFeatures;

    fn create_track(cluster: ClusterId, genre: &str) -> Track {
        Track {
            cluster,
            genre: genre.to_string(),
            ..Track::default()
        }
    }

    fn evaluate(mut tracks: Vec<Track>, state: &FilterState) -> (DatasetStore, FilteredView) {
        // Loudness needs a spread to normalize
        for (i, track) in tracks.iter_mut().enumerate() {
            track.features = AudioFeatures {
                loudness: -(i as f64),
                ..AudioFeatures::default()
            };
        }
        let store = DatasetStore::load(tracks).unwrap();
        let view = FilterEngine::evaluate(&store, state, &ArtistTokenizer::default());
        (store, view)
    }

    #[test]
    fn test_highlight_counts_per_cluster() {
        let tracks = vec![
            create_track(2, "rock"),
            create_track(0, "pop"),
            create_track(2, "pop"),
            create_track(0, "pop"),
        ];
        let state = FilterState::default().toggle_genre("pop");
        let (store, view) = evaluate(tracks, &state);

        let counts = highlight_by_cluster(store.records(), &view);

        assert_eq!(
            counts,
            vec![
                ClusterHighlight { cluster: 0, highlighted: 2, dimmed: 0 },
                ClusterHighlight { cluster: 2, highlighted: 1, dimmed: 1 },
            ]
        );
    }

    #[test]
    fn test_highlight_counts_when_nothing_matches() {
        let state = FilterState::default().set_cluster(Some(7));
        let (store, view) = evaluate(vec![create_track(1, "pop"), create_track(1, "rock")], &state);

        let counts = highlight_by_cluster(store.records(), &view);

        assert_eq!(counts, vec![ClusterHighlight { cluster: 1, highlighted: 0, dimmed: 2 }]);
    }
}
