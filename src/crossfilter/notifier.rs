use super::{Aggregates, FilteredView};
use crate::models::Track;

/// What a renderer implements to receive recomputed subsets and aggregates.
///
/// The session calls these synchronously after each committed filter change,
/// always with data derived from that latest state. Implementations only
/// consume; they never call back into the session.
pub trait ViewNotifier {
    /// Tracks passing every active filter
    fn on_primary_update(&mut self, records: &[&Track]);

    /// Tracks passing every filter but the date range; feeds the date selector
    fn on_date_context_update(&mut self, records: &[&Track]);

    fn on_aggregates_update(&mut self, aggregates: &Aggregates);

    /// All four dimensions were cleared
    fn on_reset(&mut self);

    /// Whole dataset plus the membership index, for full-opacity vs dimmed
    /// drawing. Track ids are positions in `dataset`.
    fn on_highlight_update(&mut self, _dataset: &[Track], _view: &FilteredView) {}
}
