use chrono::NaiveDate;

use super::{
    Aggregation, ArtistTokenizer, CrossfilterError, DatasetStore, DateRange, Dimension,
    EngineConfig, FilterEngine, FilterOptions, FilterState, FilteredView, ViewNotifier,
};
use crate::loader::TrackSource;
use crate::models::ClusterId;

/// Which views a committed change can affect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Initial,
    Dimension(Dimension),
    Reset,
}

impl Change {
    /// The date context ignores the date range, so brushing a range never
    /// changes it
    fn refreshes_date_context(self) -> bool {
        self != Change::Dimension(Dimension::DateRange)
    }
}

/// One cross-filter engine instance: the loaded dataset, the current
/// selection and the renderer it reports to.
///
/// A session only exists once ingestion has succeeded, so every mutation
/// runs against a fully loaded store.
pub struct CrossfilterSession<N: ViewNotifier> {
    store: DatasetStore,
    state: FilterState,
    config: EngineConfig,
    tokenizer: ArtistTokenizer,
    view: FilteredView,
    notifier: N,
}

impl<N: ViewNotifier> CrossfilterSession<N> {
    /// Ingest from `source` and start a session; ingestion and normalization
    /// failures are returned before any filter can be applied
    pub fn open(
        source: &dyn TrackSource,
        config: EngineConfig,
        notifier: N,
    ) -> Result<Self, CrossfilterError> {
        let tracks = source.load().map_err(CrossfilterError::Ingestion)?;
        let store = DatasetStore::load(tracks)?;
        Ok(Self::new(store, config, notifier))
    }

    /// Start a session over an already loaded store and deliver the initial,
    /// unfiltered views
    pub fn new(store: DatasetStore, config: EngineConfig, notifier: N) -> Self {
        let tokenizer = ArtistTokenizer::new(config.artist_exceptions.iter().cloned());
        let mut session = Self {
            store,
            state: FilterState::default(),
            config,
            tokenizer,
            view: FilteredView::default(),
            notifier,
        };
        session.commit(FilterState::default(), Change::Initial);
        session
    }

    pub fn set_cluster(&mut self, cluster: Option<ClusterId>) {
        let next = self.state.set_cluster(cluster);
        self.commit(next, Change::Dimension(Dimension::Cluster));
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        let next = self.state.set_date_range(range);
        self.commit(next, Change::Dimension(Dimension::DateRange));
    }

    /// Validate and apply an inclusive range in one step
    pub fn select_dates(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), CrossfilterError> {
        let range = DateRange::new(start, end)?;
        self.set_date_range(Some(range));
        Ok(())
    }

    pub fn toggle_genre(&mut self, genre: &str) {
        let next = self.state.toggle_genre(genre);
        self.commit(next, Change::Dimension(Dimension::Genre));
    }

    pub fn toggle_artist(&mut self, artist: &str) {
        let next = self.state.toggle_artist(artist);
        self.commit(next, Change::Dimension(Dimension::Artist));
    }

    pub fn reset(&mut self) {
        let next = self.state.reset();
        self.commit(next, Change::Reset);
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    #[cfg(test)]
    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn has_active_filters(&self) -> bool {
        self.state.has_active_filters()
    }

    /// Genre and artist choices for the currently selected cluster
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::collect(&self.store, &self.tokenizer, self.state.cluster)
    }

    #[cfg(test)]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    #[cfg(test)]
    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Swap in the new state, recompute, then notify. Nothing is delivered
    /// until the state and every derived value belong to the same commit.
    fn commit(&mut self, next: FilterState, change: Change) {
        self.state = next;
        self.view = FilterEngine::evaluate(&self.store, &self.state, &self.tokenizer);
        let aggregates = Aggregation::summarize(&self.store, &self.view, &self.config, &self.tokenizer);

        log::debug!(
            "Committed {:?}: {} of {} tracks selected, {} in date context",
            change,
            self.view.primary().len(),
            self.store.len(),
            self.view.date_context().len()
        );

        if change == Change::Reset {
            self.notifier.on_reset();
        }

        let primary = self.view.primary_tracks(&self.store);
        self.notifier.on_primary_update(&primary);
        self.notifier.on_highlight_update(self.store.records(), &self.view);

        if change.refreshes_date_context() {
            let date_context = self.view.date_context_tracks(&self.store);
            self.notifier.on_date_context_update(&date_context);
        }

        self.notifier.on_aggregates_update(&aggregates);
    }
}
