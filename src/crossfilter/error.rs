use chrono::NaiveDate;
use thiserror::Error;

use crate::models::AudioFeature;

/// Errors surfaced by the cross-filter core.
///
/// Everything after a successful load is total: evaluation and aggregation
/// never fail, so these only show up at the edges (ingestion, settings and
/// malformed user input).
#[derive(Debug, Error)]
pub enum CrossfilterError {
    #[error("loudness has no spread to normalize over (min = max = {min})")]
    DegenerateRange { min: f64, max: f64 },

    #[error("track {index} has a non-finite {feature} value")]
    NonFiniteFeature { index: usize, feature: AudioFeature },

    #[error("failed to ingest track data")]
    Ingestion(#[source] anyhow::Error),

    #[error("date range starts after it ends ({start} > {end})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("failed to load engine settings: {0}")]
    Settings(String),
}
