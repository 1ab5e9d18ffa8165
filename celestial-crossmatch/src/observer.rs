//! Progress reporting hooks.
//!
//! The engine and the sweep never print. Callers that want progress attach
//! a [`MatchObserver`]; [`LogObserver`] forwards everything to the `log`
//! facade at info level and [`NullObserver`] discards it.

use celestial_core::Angle;

use crate::result::MatchSummary;

/// Receives progress notifications. All methods default to no-ops.
pub trait MatchObserver: Send + Sync {
    fn on_index_built(&self, _entries: usize, _cells: usize, _cell_size: Angle) {}

    fn on_match_complete(&self, _radius: Angle, _summary: &MatchSummary) {}

    /// One cutoff row of a sweep finished; `counts[i]` is the match count at radius step `i`.
    fn on_sweep_row(&self, _cutoff: f64, _counts: &[usize]) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl MatchObserver for NullObserver {}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl MatchObserver for LogObserver {
    fn on_index_built(&self, entries: usize, cells: usize, cell_size: Angle) {
        log::info!(
            "Indexed {} secondary entries into {} cells ({:.2}\" per side)",
            entries,
            cells,
            cell_size.arcseconds()
        );
    }

    fn on_match_complete(&self, radius: Angle, summary: &MatchSummary) {
        log::info!(
            "Matched {} pairs within {:.2}\"",
            summary.matched,
            radius.arcseconds()
        );
        log::info!("Unmatched primary entries: {}", summary.primary_unmatched);
        log::info!(
            "Unmatched secondary entries: {}",
            summary.secondary_unmatched
        );
    }

    fn on_sweep_row(&self, cutoff: f64, counts: &[usize]) {
        let peak = counts.iter().copied().max().unwrap_or(0);
        log::info!(
            "Cutoff {:.2}: {} radius steps, up to {} matches",
            cutoff,
            counts.len(),
            peak
        );
    }
}
