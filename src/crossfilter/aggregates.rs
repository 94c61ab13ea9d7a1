use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{ArtistTokenizer, DatasetStore, EngineConfig, FilteredView};
use crate::models::{AudioFeature, Track};

/// Mean of one audio feature over a subset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureAverage {
    pub feature: AudioFeature,
    pub mean: f64,
}

/// One ranked group (a genre or an artist) with its average value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage {
    pub key: String,
    pub average: f64,
    /// Tracks that contributed a value to the average
    pub count: usize,
}

/// A track in the popularity ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTrack {
    pub track_name: String,
    pub artists: String,
    pub popularity: Option<f64>,
}

/// One calendar month of the release-date histogram, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthBin {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub count: usize,
}

/// Order of the genre and artist rankings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Descending,
    Ascending,
}

/// Everything the views need after a filter change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub track_count: usize,
    pub feature_averages: Vec<FeatureAverage>,
    pub top_genres: Vec<GroupAverage>,
    pub top_artists: Vec<GroupAverage>,
    pub top_tracks: Vec<RankedTrack>,
    pub histogram: Vec<MonthBin>,
}

impl Aggregates {
    pub fn feature_mean(&self, feature: AudioFeature) -> Option<f64> {
        self.feature_averages
            .iter()
            .find(|avg| avg.feature == feature)
            .map(|avg| avg.mean)
    }
}

/// Stateless aggregate functions over track subsets.
///
/// None of these fail: an empty subset yields zero means, empty rankings and
/// zero-count bins.
pub struct Aggregation;

impl Aggregation {
    /// Arithmetic mean per feature, 0 for an empty subset
    pub fn feature_averages(records: &[&Track], features: &[AudioFeature]) -> Vec<FeatureAverage> {
        features
            .iter()
            .map(|&feature| {
                let mean = if records.is_empty() {
                    0.0
                } else {
                    records.iter().map(|t| feature.value(t)).sum::<f64>() / records.len() as f64
                };
                FeatureAverage { feature, mean }
            })
            .collect()
    }

    /// Group by `key_fn`, average `value_fn` per group, sort and keep `n`.
    ///
    /// A track joins every group `key_fn` returns. Tracks without a value are
    /// skipped entirely. Equal averages keep the order in which their groups
    /// first appeared.
    pub fn top_n<K, V>(
        records: &[&Track],
        key_fn: K,
        value_fn: V,
        n: usize,
        direction: SortDirection,
    ) -> Vec<GroupAverage>
    where
        K: Fn(&Track) -> Vec<String>,
        V: Fn(&Track) -> Option<f64>,
    {
        let mut order: Vec<(String, f64, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for &track in records {
            let Some(value) = value_fn(track) else {
                continue;
            };
            for key in key_fn(track) {
                if key.is_empty() {
                    continue;
                }
                let pos = *positions.entry(key.clone()).or_insert_with(|| {
                    order.push((key, 0.0, 0));
                    order.len() - 1
                });
                let group = &mut order[pos];
                group.1 += value;
                group.2 += 1;
            }
        }

        let mut groups: Vec<GroupAverage> = order
            .into_iter()
            .map(|(key, sum, count)| GroupAverage {
                key,
                average: sum / count as f64,
                count,
            })
            .collect();

        match direction {
            SortDirection::Descending => groups.sort_by(|a, b| b.average.total_cmp(&a.average)),
            SortDirection::Ascending => groups.sort_by(|a, b| a.average.total_cmp(&b.average)),
        }
        groups.truncate(n);
        groups
    }

    /// Most popular first; unknown popularity sorts last; ties keep input order
    pub fn top_tracks_by_popularity<'a>(records: &[&'a Track], n: usize) -> Vec<&'a Track> {
        let mut sorted = records.to_vec();
        sorted.sort_by(|a, b| match (a.popularity, b.popularity) {
            (Some(pa), Some(pb)) => pb.total_cmp(&pa),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        sorted.truncate(n);
        sorted
    }

    /// Monthly counts from `fixed_start` up to `fixed_end`, or up to the
    /// latest date in the subset when no end is given.
    ///
    /// Undated tracks and dates outside the span are not counted. When the
    /// span is empty a single zero bin for the starting month is returned.
    pub fn histogram_bins<D>(
        records: &[&Track],
        date_fn: D,
        fixed_start: NaiveDate,
        fixed_end: Option<NaiveDate>,
    ) -> Vec<MonthBin>
    where
        D: Fn(&Track) -> Option<NaiveDate>,
    {
        let upper = fixed_end
            .or_else(|| records.iter().filter_map(|&t| date_fn(t)).max())
            .filter(|&end| end >= fixed_start)
            .unwrap_or(fixed_start);

        let first_month = fixed_start.with_day(1).unwrap_or(fixed_start);
        let months = (month_index(upper) - month_index(fixed_start)) as u32 + 1;

        let mut bins: Vec<MonthBin> = (0..months)
            .filter_map(|i| {
                let start = first_month.checked_add_months(Months::new(i))?;
                let end = start.checked_add_months(Months::new(1))?;
                Some(MonthBin {
                    start: start.max(fixed_start),
                    end,
                    count: 0,
                })
            })
            .collect();

        for date in records.iter().filter_map(|&t| date_fn(t)) {
            if date < fixed_start || date > upper {
                continue;
            }
            let idx = (month_index(date) - month_index(fixed_start)) as usize;
            if let Some(bin) = bins.get_mut(idx) {
                bin.count += 1;
            }
        }

        bins
    }

    /// Compute the full aggregate bundle for one evaluated view
    pub fn summarize(
        store: &DatasetStore,
        view: &FilteredView,
        config: &EngineConfig,
        tokenizer: &ArtistTokenizer,
    ) -> Aggregates {
        let primary = view.primary_tracks(store);
        let date_context = view.date_context_tracks(store);

        let top_genres = Self::top_n(
            &primary,
            |t| vec![t.genre.clone()],
            |t| t.popularity,
            config.top_n,
            config.ranking,
        );
        let top_artists = Self::top_n(
            &primary,
            |t| tokenizer.split(&t.artist_field),
            |t| t.popularity,
            config.top_n,
            config.ranking,
        );
        let top_tracks = Self::top_tracks_by_popularity(&primary, config.top_n)
            .into_iter()
            .map(|t| RankedTrack {
                track_name: t.track_name.clone(),
                artists: t.artist_field.clone(),
                popularity: t.popularity,
            })
            .collect();

        Aggregates {
            track_count: primary.len(),
            feature_averages: Self::feature_averages(&primary, &config.features),
            top_genres,
            top_artists,
            top_tracks,
            histogram: Self::histogram_bins(
                &date_context,
                |t| t.release_date,
                config.histogram_start,
                None,
            ),
        }
    }
}

fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}
