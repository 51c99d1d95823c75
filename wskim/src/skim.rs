//! Orchestration for `wskim run`: open inputs, select, persist.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::io::config::SelectionConfig;
use crate::io::dataset_store::{DatasetFile, digest_sources, write_dataset};
use crate::io::event_source::{EventSource, JsonlChain};
use crate::selection::run_selection;

/// Inputs for a single skim run.
#[derive(Debug, Clone)]
pub struct SkimRequest {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub config: SelectionConfig,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkimSummary {
    pub events: usize,
    pub selected: usize,
    pub output: PathBuf,
}

/// Run the full skim.
///
/// Nothing is written when the selection aborts on a corrupt event.
pub fn run_skim(request: &SkimRequest) -> Result<SkimSummary> {
    request.config.validate()?;
    request.config.log_options();

    let mut source = JsonlChain::open(&request.inputs).context("open inputs")?;
    let total = source.len();
    let cuts = request.config.cuts();
    let outcome = run_selection(&mut source, &cuts, |index, total| {
        info!("Event: {} / {}", index, total);
    })
    .context("problem while reading events")?;

    let flow = outcome.cutflow;
    info!(
        events = flow.events,
        candidates = flow.candidates,
        tight = flow.tight,
        trigger = flow.trigger,
        isolated = flow.isolated,
        selected = flow.selected,
        "cut flow"
    );

    let sources = digest_sources(source.paths()).context("hash inputs")?;
    let selected = outcome.rows.len();
    let dataset = DatasetFile::new(sources, request.config, flow, outcome.rows, Utc::now());
    write_dataset(&request.output, &dataset)
        .with_context(|| format!("write dataset {}", request.output.display()))?;
    info!(output = %request.output.display(), selected, "dataset written");

    Ok(SkimSummary {
        events: total,
        selected,
        output: request.output.clone(),
    })
}

/// Count events across the chained inputs.
pub fn count_events(inputs: &[PathBuf]) -> Result<usize> {
    let source = JsonlChain::open(inputs).context("open inputs")?;
    Ok(source.len())
}
