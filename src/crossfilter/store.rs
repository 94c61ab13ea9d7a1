use super::CrossfilterError;
use crate::models::{AudioFeature, Track};

/// The immutable track collection every evaluation reads from.
///
/// Built once by [`DatasetStore::load`]; there is no way to mutate it
/// afterwards, so any number of evaluations may share it.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    tracks: Vec<Track>,
}

impl DatasetStore {
    /// Take ownership of the ingested tracks and min-max normalize loudness
    /// over the whole collection. Insertion order is preserved.
    ///
    /// An empty collection loads fine. A non-finite feature, or a single
    /// distinct loudness value, is reported instead of producing NaN.
    pub fn load(mut tracks: Vec<Track>) -> Result<Self, CrossfilterError> {
        if tracks.is_empty() {
            return Ok(Self { tracks });
        }

        for (index, track) in tracks.iter().enumerate() {
            if let Some(&feature) = AudioFeature::ALL
                .iter()
                .find(|f| !f.value(track).is_finite())
            {
                return Err(CrossfilterError::NonFiniteFeature { index, feature });
            }
        }

        let (min, max) = tracks.iter().map(|t| t.features.loudness).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        );

        if min == max {
            return Err(CrossfilterError::DegenerateRange { min, max });
        }

        let span = max - min;
        for track in &mut tracks {
            track.features.loudness = (track.features.loudness - min) / span;
        }

        log::info!(
            "Loaded {} tracks (loudness {:.2}..{:.2} dB rescaled to 0..1)",
            tracks.len(),
            min,
            max
        );

        Ok(Self { tracks })
    }

    /// All tracks in ingestion order
    pub fn records(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, id: usize) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AudioFeatures;
    use approx::assert_relative_eq;

    fn track_with_loudness(name: &str, loudness: f64) -> Track {
        Track {
            track_name: name.to_string(),
            features: AudioFeatures {
                loudness,
                ..AudioFeatures::default()
            },
            ..Track::default()
        }
    }

    #[test]
    fn test_loudness_rescaled_to_unit_interval() {
        let store = DatasetStore::load(vec![
            track_with_loudness("a", -20.0),
            track_with_loudness("b", -5.0),
            track_with_loudness("c", -10.0),
        ])
        .unwrap();

        let loudness: Vec<f64> = store
            .records()
            .iter()
            .map(|t| t.features.loudness)
            .collect();
        assert_relative_eq!(loudness[0], 0.0);
        assert_relative_eq!(loudness[1], 1.0);
        assert_relative_eq!(loudness[2], 2.0 / 3.0);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let store = DatasetStore::load(vec![
            track_with_loudness("z", -1.0),
            track_with_loudness("a", -9.0),
            track_with_loudness("m", -4.0),
        ])
        .unwrap();

        let names: Vec<&str> = store
            .records()
            .iter()
            .map(|t| t.track_name.as_str())
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_degenerate_loudness_range_is_reported() {
        let err = DatasetStore::load(vec![
            track_with_loudness("a", -6.0),
            track_with_loudness("b", -6.0),
        ])
        .unwrap_err();

        assert!(matches!(err, CrossfilterError::DegenerateRange { min, max } if min == -6.0 && max == -6.0));
    }

    #[test]
    fn test_non_finite_loudness_is_reported() {
        let err = DatasetStore::load(vec![
            track_with_loudness("a", -6.0),
            track_with_loudness("b", f64::NAN),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            CrossfilterError::NonFiniteFeature { index: 1, feature: AudioFeature::Loudness }
        ));
    }

    #[test]
    fn test_non_finite_energy_is_reported() {
        let mut bad = track_with_loudness("b", -3.0);
        bad.features.energy = f64::INFINITY;
        let err = DatasetStore::load(vec![track_with_loudness("a", -6.0), bad]).unwrap_err();

        assert!(matches!(
            err,
            CrossfilterError::NonFiniteFeature { index: 1, feature: AudioFeature::Energy }
        ));
    }

    #[test]
    fn test_empty_dataset_loads() {
        let store = DatasetStore::load(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.get(0).is_none());
    }
}
