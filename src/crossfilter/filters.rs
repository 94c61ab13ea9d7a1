use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

use super::CrossfilterError;
use crate::models::ClusterId;

/// Inclusive release-date interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CrossfilterError> {
        if start > end {
            return Err(CrossfilterError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Both ends are inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One of the four selection axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Cluster,
    DateRange,
    Genre,
    Artist,
}

/// The current selection on all four dimensions.
///
/// An inactive dimension is `None` or an empty set. Every operation returns a
/// new state that differs from `self` in exactly one dimension, except
/// [`FilterState::reset`], so a caller commits a whole state at once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub cluster: Option<ClusterId>,
    pub date_range: Option<DateRange>,
    pub genres: BTreeSet<String>,
    pub artists: BTreeSet<String>,
}

impl FilterState {
    pub fn set_cluster(&self, cluster: Option<ClusterId>) -> Self {
        Self {
            cluster,
            ..self.clone()
        }
    }

    pub fn set_date_range(&self, date_range: Option<DateRange>) -> Self {
        Self {
            date_range,
            ..self.clone()
        }
    }

    /// Add the genre if absent, remove it if present
    pub fn toggle_genre(&self, genre: &str) -> Self {
        let mut next = self.clone();
        toggle(&mut next.genres, genre);
        next
    }

    /// Add the artist if absent, remove it if present
    pub fn toggle_artist(&self, artist: &str) -> Self {
        let mut next = self.clone();
        toggle(&mut next.artists, artist);
        next
    }

    pub fn reset(&self) -> Self {
        Self::default()
    }

    /// Whether any dimension currently narrows the dataset
    pub fn has_active_filters(&self) -> bool {
        self.cluster.is_some()
            || self.date_range.is_some()
            || !self.genres.is_empty()
            || !self.artists.is_empty()
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}
