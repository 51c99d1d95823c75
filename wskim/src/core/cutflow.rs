//! Cut-flow bookkeeping for a selection run.

use serde::{Deserialize, Serialize};

use crate::core::decision::CandidateDecision;

/// Candidate counts per selection.
///
/// `tight`, `trigger` and `isolated` count each selection on its own;
/// `selected` counts candidates passing all three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutFlow {
    pub events: u64,
    pub candidates: u64,
    pub tight: u64,
    pub trigger: u64,
    pub isolated: u64,
    pub selected: u64,
}

impl CutFlow {
    pub fn record_event(&mut self) {
        self.events += 1;
    }

    pub fn record(&mut self, decision: &CandidateDecision) {
        self.candidates += 1;
        self.tight += u64::from(decision.tight);
        self.trigger += u64::from(decision.trigger);
        self.isolated += u64::from(decision.isolated);
        self.selected += u64::from(decision.selected());
    }
}
