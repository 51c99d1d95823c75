//! Binding raw event records into validated [`Event`] views.
//!
//! The event store keeps one parallel array per muon quantity plus a declared
//! candidate count. A record whose arrays disagree with that count means the
//! source is corrupt; the whole run stops at that event.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{Candidate, ConeSums, Event, IsolationInputs, PfSums};

/// Raw per-event record, named after the store's branches.
///
/// The event-level scalars are required. A missing per-candidate array reads
/// as empty and is then rejected by [`bind_event`] unless `nMUpart` is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "nMUpart")]
    pub n_mu: i32,
    #[serde(rename = "recoPFMET")]
    pub met: f32,
    #[serde(rename = "HLTriggers")]
    pub hl_triggers: u64,

    #[serde(default, rename = "muPt")]
    pub pt: Vec<f32>,
    #[serde(default, rename = "muEta")]
    pub eta: Vec<f32>,
    #[serde(default, rename = "muPhi")]
    pub phi: Vec<f32>,
    #[serde(default, rename = "muMt")]
    pub mt: Vec<f32>,
    #[serde(default, rename = "muIsTightMuon")]
    pub tight: Vec<bool>,
    #[serde(default, rename = "muTrig")]
    pub trig: Vec<u64>,

    #[serde(default, rename = "muIso03_sumPt")]
    pub iso03_sum_pt: Vec<f32>,
    #[serde(default, rename = "muIso03_emEt")]
    pub iso03_em_et: Vec<f32>,
    #[serde(default, rename = "muIso03_hadEt")]
    pub iso03_had_et: Vec<f32>,
    #[serde(default, rename = "muIso04_sumPt")]
    pub iso04_sum_pt: Vec<f32>,
    #[serde(default, rename = "muIso04_emEt")]
    pub iso04_em_et: Vec<f32>,
    #[serde(default, rename = "muIso04_hadEt")]
    pub iso04_had_et: Vec<f32>,
    #[serde(default, rename = "muIso05_sumPt")]
    pub iso05_sum_pt: Vec<f32>,
    #[serde(default, rename = "muIso05_emEt")]
    pub iso05_em_et: Vec<f32>,
    #[serde(default, rename = "muIso05_hadEt")]
    pub iso05_had_et: Vec<f32>,

    #[serde(default, rename = "muSumChargedHadronPt")]
    pub sum_charged_hadron_pt: Vec<f32>,
    #[serde(default, rename = "muSumNeutralHadronEt")]
    pub sum_neutral_hadron_et: Vec<f32>,
    #[serde(default, rename = "muSumPhotonEt")]
    pub sum_photon_et: Vec<f32>,
    #[serde(default, rename = "muPFBasedDBetaIso")]
    pub pf_dbeta_iso: Vec<f32>,
    #[serde(default, rename = "muTrackIso")]
    pub track_iso: Vec<f32>,
}

impl EventRecord {
    /// Length of every per-candidate array, keyed by branch name.
    ///
    /// `muPt` comes first: it is the array the declared count is checked
    /// against before anything else.
    fn array_lengths(&self) -> [(&'static str, usize); 20] {
        [
            ("muPt", self.pt.len()),
            ("muEta", self.eta.len()),
            ("muPhi", self.phi.len()),
            ("muMt", self.mt.len()),
            ("muIsTightMuon", self.tight.len()),
            ("muTrig", self.trig.len()),
            ("muIso03_sumPt", self.iso03_sum_pt.len()),
            ("muIso03_emEt", self.iso03_em_et.len()),
            ("muIso03_hadEt", self.iso03_had_et.len()),
            ("muIso04_sumPt", self.iso04_sum_pt.len()),
            ("muIso04_emEt", self.iso04_em_et.len()),
            ("muIso04_hadEt", self.iso04_had_et.len()),
            ("muIso05_sumPt", self.iso05_sum_pt.len()),
            ("muIso05_emEt", self.iso05_em_et.len()),
            ("muIso05_hadEt", self.iso05_had_et.len()),
            ("muSumChargedHadronPt", self.sum_charged_hadron_pt.len()),
            ("muSumNeutralHadronEt", self.sum_neutral_hadron_et.len()),
            ("muSumPhotonEt", self.sum_photon_et.len()),
            ("muPFBasedDBetaIso", self.pf_dbeta_iso.len()),
            ("muTrackIso", self.track_iso.len()),
        ]
    }

    fn candidate(&self, i: usize) -> Candidate {
        Candidate {
            pt: self.pt[i],
            eta: self.eta[i],
            phi: self.phi[i],
            mt: self.mt[i],
            tight: self.tight[i],
            trigger_bits: self.trig[i],
            isolation: IsolationInputs {
                cone03: ConeSums {
                    sum_pt: self.iso03_sum_pt[i],
                    em_et: self.iso03_em_et[i],
                    had_et: self.iso03_had_et[i],
                },
                cone04: ConeSums {
                    sum_pt: self.iso04_sum_pt[i],
                    em_et: self.iso04_em_et[i],
                    had_et: self.iso04_had_et[i],
                },
                cone05: ConeSums {
                    sum_pt: self.iso05_sum_pt[i],
                    em_et: self.iso05_em_et[i],
                    had_et: self.iso05_had_et[i],
                },
                pf: PfSums {
                    charged_hadron_pt: self.sum_charged_hadron_pt[i],
                    neutral_hadron_et: self.sum_neutral_hadron_et[i],
                    photon_et: self.sum_photon_et[i],
                },
                pf_dbeta_iso: self.pf_dbeta_iso[i],
                tracker_iso: self.track_iso[i],
            },
        }
    }
}

/// The declared candidate count disagrees with a per-candidate array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCountMismatch {
    /// Index of the offending event in the source.
    pub event: usize,
    /// Value of `nMUpart`.
    pub declared: i32,
    /// Branch whose length disagrees.
    pub field: &'static str,
    pub actual: usize,
}

impl fmt::Display for CandidateCountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nMUpart != {}.size() at event {} ({} != {})",
            self.field, self.event, self.declared, self.actual
        )
    }
}

impl std::error::Error for CandidateCountMismatch {}

/// Validate `record` and build the typed event view.
///
/// Every per-candidate array must hold exactly `nMUpart` entries.
pub fn bind_event(index: usize, record: &EventRecord) -> Result<Event, CandidateCountMismatch> {
    for (field, actual) in record.array_lengths() {
        if usize::try_from(record.n_mu).ok() != Some(actual) {
            return Err(CandidateCountMismatch {
                event: index,
                declared: record.n_mu,
                field,
                actual,
            });
        }
    }

    Ok(Event {
        index,
        met: record.met,
        trigger_bits: record.hl_triggers,
        candidates: (0..record.pt.len()).map(|i| record.candidate(i)).collect(),
    })
}
