//! Per-candidate selection decision.

use crate::core::isolation::{IsolationCut, is_isolated};
use crate::core::types::{Candidate, Event};

/// The cut values the decision needs, taken from the run configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionCuts {
    pub iso_cut: IsolationCut,
    pub threshold: f32,
    /// Bit position of the trigger path. Must be below 64.
    pub trigger_index: u32,
}

/// Outcome of the three independent selections for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateDecision {
    pub tight: bool,
    pub trigger: bool,
    pub isolated: bool,
}

impl CandidateDecision {
    pub fn selected(&self) -> bool {
        self.tight && self.trigger && self.isolated
    }
}

/// True iff bit `trigger_index` is set in both the candidate and the event masks.
///
/// An index outside the 64-bit mask never matches.
pub fn passes_trigger(trigger_index: u32, candidate_bits: u64, event_bits: u64) -> bool {
    let Some(mask) = 1u64.checked_shl(trigger_index) else {
        return false;
    };
    (candidate_bits & mask) == mask && (event_bits & mask) == mask
}

/// Evaluate every selection for `candidate`; nothing is short-circuited.
pub fn decide(cuts: &SelectionCuts, event: &Event, candidate: &Candidate) -> CandidateDecision {
    CandidateDecision {
        tight: candidate.tight,
        trigger: passes_trigger(cuts.trigger_index, candidate.trigger_bits, event.trigger_bits),
        isolated: is_isolated(cuts.iso_cut, cuts.threshold, candidate),
    }
}
