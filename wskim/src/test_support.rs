//! Test-only helpers for building event records and in-memory sources.

use anyhow::{Result, anyhow};

use crate::core::binding::EventRecord;
use crate::io::event_source::EventSource;

/// Per-muon values for [`event_record`], with selection-friendly defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuonFields {
    pub pt: f32,
    pub eta: f32,
    pub phi: f32,
    pub mt: f32,
    pub tight: bool,
    pub trig: u64,
    /// `(sumPt, emEt, hadEt)` for the 0.3 cone.
    pub iso03: (f32, f32, f32),
    /// `(charged, neutral, photon)` particle-flow sums.
    pub pf: (f32, f32, f32),
    pub pf_dbeta_iso: f32,
    pub track_iso: f32,
}

/// A tight muon matched to trigger bit 5 with zero isolation energy.
pub fn muon(pt: f32, mt: f32) -> MuonFields {
    MuonFields {
        pt,
        eta: 0.5,
        phi: 0.0,
        mt,
        tight: true,
        trig: 1 << 5,
        iso03: (0.0, 0.0, 0.0),
        pf: (0.0, 0.0, 0.0),
        pf_dbeta_iso: 0.0,
        track_iso: 0.0,
    }
}

/// Build a consistent record (declared count equals every array length).
///
/// The 0.4 and 0.5 cone sums reuse the 0.3 cone values.
pub fn event_record(met: f32, hl_triggers: u64, muons: &[MuonFields]) -> EventRecord {
    let col = |f: fn(&MuonFields) -> f32| muons.iter().map(f).collect::<Vec<_>>();
    EventRecord {
        n_mu: muons.len() as i32,
        met,
        hl_triggers,
        pt: col(|m| m.pt),
        eta: col(|m| m.eta),
        phi: col(|m| m.phi),
        mt: col(|m| m.mt),
        tight: muons.iter().map(|m| m.tight).collect(),
        trig: muons.iter().map(|m| m.trig).collect(),
        iso03_sum_pt: col(|m| m.iso03.0),
        iso03_em_et: col(|m| m.iso03.1),
        iso03_had_et: col(|m| m.iso03.2),
        iso04_sum_pt: col(|m| m.iso03.0),
        iso04_em_et: col(|m| m.iso03.1),
        iso04_had_et: col(|m| m.iso03.2),
        iso05_sum_pt: col(|m| m.iso03.0),
        iso05_em_et: col(|m| m.iso03.1),
        iso05_had_et: col(|m| m.iso03.2),
        sum_charged_hadron_pt: col(|m| m.pf.0),
        sum_neutral_hadron_et: col(|m| m.pf.1),
        sum_photon_et: col(|m| m.pf.2),
        pf_dbeta_iso: col(|m| m.pf_dbeta_iso),
        track_iso: col(|m| m.track_iso),
    }
}

/// In-memory [`EventSource`] that counts fetches.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    records: Vec<EventRecord>,
    fetched: usize,
}

impl VecSource {
    pub fn new(records: Vec<EventRecord>) -> Self {
        Self {
            records,
            fetched: 0,
        }
    }

    /// Number of successful `fetch` calls so far.
    pub fn fetched(&self) -> usize {
        self.fetched
    }
}

impl EventSource for VecSource {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn fetch(&mut self, index: usize) -> Result<EventRecord> {
        let record = self
            .records
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow!("event {} out of range", index))?;
        self.fetched += 1;
        Ok(record)
    }
}

/// Serialize records as JSON Lines into `dir/name` and return the path.
pub fn write_jsonl(
    dir: &std::path::Path,
    name: &str,
    records: &[EventRecord],
) -> Result<std::path::PathBuf> {
    let path = dir.join(name);
    let mut buf = String::new();
    for record in records {
        buf.push_str(&serde_json::to_string(record)?);
        buf.push('\n');
    }
    std::fs::write(&path, buf)?;
    Ok(path)
}

