//! The event selection loop.

use anyhow::Result;
use tracing::{debug, trace};

use crate::core::binding::bind_event;
use crate::core::cutflow::CutFlow;
use crate::core::decision::{SelectionCuts, decide};
use crate::core::isolation::relative_isolation;
use crate::core::types::SelectedMuon;
use crate::io::event_source::EventSource;

/// Events between two progress notifications.
pub const PROGRESS_INTERVAL: usize = 100_000;

/// Everything a completed selection pass produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    /// Accepted candidates in event order, then candidate order.
    pub rows: Vec<SelectedMuon>,
    pub cutflow: CutFlow,
}

/// Run the selection over every event of `source`.
///
/// `on_progress(index, total)` fires on event 0 and every
/// [`PROGRESS_INTERVAL`] events after it.
///
/// Stops at the first event whose arrays disagree with its declared candidate
/// count; the error wraps a [`crate::core::binding::CandidateCountMismatch`]
/// and the rows accumulated so far are discarded.
pub fn run_selection<S: EventSource, F: FnMut(usize, usize)>(
    source: &mut S,
    cuts: &SelectionCuts,
    mut on_progress: F,
) -> Result<SelectionOutcome> {
    let total = source.len();
    let mut rows = Vec::new();
    let mut cutflow = CutFlow::default();

    for index in 0..total {
        if index % PROGRESS_INTERVAL == 0 {
            on_progress(index, total);
        }
        let record = source.fetch(index)?;
        let event = bind_event(index, &record)?;
        cutflow.record_event();

        for (i_mu, candidate) in event.candidates.iter().enumerate() {
            let decision = decide(cuts, &event, candidate);
            cutflow.record(&decision);
            trace!(
                event = index,
                i_mu,
                tight = decision.tight,
                trigger = decision.trigger,
                isolated = decision.isolated,
                iso = ?relative_isolation(cuts.iso_cut, candidate),
                "candidate decided"
            );
            if decision.selected() {
                rows.push(SelectedMuon::from_candidate(&event, candidate));
            }
        }
    }

    debug!(events = total, selected = rows.len(), "selection finished");
    Ok(SelectionOutcome { rows, cutflow })
}
