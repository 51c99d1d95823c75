//! Shared deterministic types for the selection core.
//!
//! These are the validated, per-event views the selection logic operates on.
//! They are built once per event by [`crate::core::binding::bind_event`] and
//! carry no references back into the event store.

use serde::{Deserialize, Serialize};

/// Energy sums inside one isolation cone around a muon.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConeSums {
    /// Scalar sum of track transverse momenta.
    pub sum_pt: f32,
    /// Electromagnetic calorimeter transverse energy.
    pub em_et: f32,
    /// Hadronic calorimeter transverse energy.
    pub had_et: f32,
}

impl ConeSums {
    pub fn total(&self) -> f32 {
        self.sum_pt + self.em_et + self.had_et
    }
}

/// Particle-flow isolation sums (cone 0.4).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PfSums {
    pub charged_hadron_pt: f32,
    pub neutral_hadron_et: f32,
    pub photon_et: f32,
}

/// Every alternative isolation input recorded for one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IsolationInputs {
    pub cone03: ConeSums,
    pub cone04: ConeSums,
    pub cone05: ConeSums,
    pub pf: PfSums,
    /// Precomputed delta-beta corrected relative isolation. Already a ratio.
    pub pf_dbeta_iso: f32,
    /// Tracker-only absolute isolation.
    pub tracker_iso: f32,
}

/// One reconstructed muon within one event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Candidate {
    pub pt: f32,
    pub eta: f32,
    pub phi: f32,
    /// Transverse mass of the muon + missing energy system.
    pub mt: f32,
    pub tight: bool,
    /// Trigger paths this muon was matched to, one bit per path.
    pub trigger_bits: u64,
    pub isolation: IsolationInputs,
}

/// A validated event: the candidate list length is known to match the
/// declared candidate count.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Position of the event in the source (0-indexed).
    pub index: usize,
    /// Missing transverse energy, shared by every candidate.
    pub met: f32,
    /// Trigger paths that fired for the whole event.
    pub trigger_bits: u64,
    pub candidates: Vec<Candidate>,
}

/// One accepted candidate, as written to the output dataset.
///
/// Serialized as the tuple `(TMass, MET, Pt, Eta)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f32, f32, f32, f32)", into = "(f32, f32, f32, f32)")]
pub struct SelectedMuon {
    pub mt: f32,
    pub met: f32,
    pub pt: f32,
    pub eta: f32,
}

impl SelectedMuon {
    pub fn from_candidate(event: &Event, candidate: &Candidate) -> Self {
        Self {
            mt: candidate.mt,
            met: event.met,
            pt: candidate.pt,
            eta: candidate.eta,
        }
    }
}

impl From<(f32, f32, f32, f32)> for SelectedMuon {
    fn from((mt, met, pt, eta): (f32, f32, f32, f32)) -> Self {
        Self { mt, met, pt, eta }
    }
}

impl From<SelectedMuon> for (f32, f32, f32, f32) {
    fn from(row: SelectedMuon) -> Self {
        (row.mt, row.met, row.pt, row.eta)
    }
}
