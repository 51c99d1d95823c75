//! Selection configuration, optionally stored as TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::decision::SelectionCuts;
use crate::core::isolation::IsolationCut;

/// Selection options fixed for the duration of a run.
///
/// Missing fields default to the values the production skim runs with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Isolation cut variant id (`0`, `13`, `14`, `15`, `2`, `21`, `3`).
    pub iso_cut: IsolationCut,

    /// Isolation values must be strictly below this.
    pub threshold: f32,

    /// Trigger path bit required in both the muon and event trigger masks.
    pub trigger_index: u32,

    /// Input is simulation. Recorded only.
    pub mc: bool,

    /// Apply event weights. Recorded only.
    pub weight: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            iso_cut: IsolationCut::None,
            threshold: 0.1,
            trigger_index: 5,
            mc: false,
            weight: false,
        }
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trigger_index >= u64::BITS {
            return Err(anyhow!(
                "trigger_index must be < {} (got {})",
                u64::BITS,
                self.trigger_index
            ));
        }
        if !self.threshold.is_finite() {
            return Err(anyhow!("threshold must be finite (got {})", self.threshold));
        }
        Ok(())
    }

    pub fn cuts(&self) -> SelectionCuts {
        SelectionCuts {
            iso_cut: self.iso_cut,
            threshold: self.threshold,
            trigger_index: self.trigger_index,
        }
    }

    /// Log the effective options once before the event loop starts.
    pub fn log_options(&self) {
        info!(
            mc = self.mc,
            weight = self.weight,
            iso_cut = self.iso_cut.id(),
            threshold = self.threshold,
            trigger_index = self.trigger_index,
            "selection options"
        );
        if !self.iso_cut.is_recognized() {
            warn!(
                iso_cut = self.iso_cut.id(),
                "unrecognized isolation cut; no candidate will be isolated"
            );
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SelectionConfig::default()`.
pub fn load_config(path: &Path) -> Result<SelectionConfig> {
    if !path.exists() {
        let cfg = SelectionConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SelectionConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &SelectionConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, SelectionConfig::default());
        assert_eq!(cfg.iso_cut, IsolationCut::None);
        assert_eq!(cfg.trigger_index, 5);
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        let cfg = SelectionConfig {
            iso_cut: IsolationCut::PfFlooredNeutral,
            mc: true,
            ..SelectionConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "iso_cut = 13\nthreshold = 0.15\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.iso_cut, IsolationCut::Cone03);
        assert_eq!(cfg.threshold, 0.15);
        assert_eq!(cfg.trigger_index, 5);
        assert!(!cfg.weight);
    }

    #[test]
    fn unknown_iso_cut_is_accepted() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "iso_cut = 4\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.iso_cut, IsolationCut::Unrecognized(4));
    }

    #[test]
    fn rejects_out_of_range_trigger_index() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "trigger_index = 64\n").expect("write");
        let err = load_config(&path).expect_err("invalid");
        assert!(format!("{err:#}").contains("trigger_index must be < 64"));
    }

    #[test]
    fn rejects_non_finite_threshold() {
        let cfg = SelectionConfig {
            threshold: f32::NAN,
            ..SelectionConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
