//! Isolation cut policy.
//!
//! Each variant compares one isolation quantity against the configured
//! threshold with a strict `value < threshold`. Ratios divide by the muon's
//! transverse momentum without any guard: a zero momentum yields `inf` or
//! `NaN`, and both compare false, so such a candidate is not isolated.

use serde::{Deserialize, Serialize};

use crate::core::types::Candidate;

/// Isolation cut variant, identified on the command line and in config files
/// by its integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum IsolationCut {
    /// `0`: no isolation requirement.
    None,
    /// `13`: `(sumPt + emEt + hadEt) / pt` in the 0.3 cone.
    Cone03,
    /// `14`: same as [`IsolationCut::Cone03`] in the 0.4 cone.
    Cone04,
    /// `15`: same as [`IsolationCut::Cone03`] in the 0.5 cone.
    Cone05,
    /// `2`: precomputed delta-beta corrected PF isolation, used as is.
    PfDeltaBeta,
    /// `21`: `(charged + max(neutral + photon, 0)) / pt`.
    PfFlooredNeutral,
    /// `3`: `trackerIso / pt`.
    Tracker,
    /// Any other id. Never isolated.
    Unrecognized(i32),
}

impl IsolationCut {
    pub fn id(self) -> i32 {
        match self {
            IsolationCut::None => 0,
            IsolationCut::Cone03 => 13,
            IsolationCut::Cone04 => 14,
            IsolationCut::Cone05 => 15,
            IsolationCut::PfDeltaBeta => 2,
            IsolationCut::PfFlooredNeutral => 21,
            IsolationCut::Tracker => 3,
            IsolationCut::Unrecognized(id) => id,
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, IsolationCut::Unrecognized(_))
    }
}

impl From<i32> for IsolationCut {
    fn from(id: i32) -> Self {
        match id {
            0 => IsolationCut::None,
            13 => IsolationCut::Cone03,
            14 => IsolationCut::Cone04,
            15 => IsolationCut::Cone05,
            2 => IsolationCut::PfDeltaBeta,
            21 => IsolationCut::PfFlooredNeutral,
            3 => IsolationCut::Tracker,
            other => IsolationCut::Unrecognized(other),
        }
    }
}

impl From<IsolationCut> for i32 {
    fn from(cut: IsolationCut) -> Self {
        cut.id()
    }
}

/// The quantity compared against the threshold for `cut`.
///
/// Returns `None` when the variant does not compare anything.
pub fn relative_isolation(cut: IsolationCut, candidate: &Candidate) -> Option<f32> {
    let iso = &candidate.isolation;
    let value = match cut {
        IsolationCut::None | IsolationCut::Unrecognized(_) => return None,
        IsolationCut::Cone03 => iso.cone03.total() / candidate.pt,
        IsolationCut::Cone04 => iso.cone04.total() / candidate.pt,
        IsolationCut::Cone05 => iso.cone05.total() / candidate.pt,
        IsolationCut::PfDeltaBeta => iso.pf_dbeta_iso,
        IsolationCut::PfFlooredNeutral => {
            let mut sum = iso.pf.charged_hadron_pt;
            // Negative neutral energy is detector noise; it never lowers the charged sum.
            let neutral = iso.pf.neutral_hadron_et + iso.pf.photon_et;
            if neutral > 0.0 {
                sum += neutral;
            }
            sum / candidate.pt
        }
        IsolationCut::Tracker => iso.tracker_iso / candidate.pt,
    };
    Some(value)
}

/// Decide whether `candidate` passes the isolation cut.
pub fn is_isolated(cut: IsolationCut, threshold: f32, candidate: &Candidate) -> bool {
    match cut {
        IsolationCut::None => true,
        IsolationCut::Unrecognized(_) => false,
        _ => relative_isolation(cut, candidate).is_some_and(|value| value < threshold),
    }
}
