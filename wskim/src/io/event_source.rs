//! Event sources: where the selection loop fetches raw records from.
//!
//! Input files hold one JSON event record per line. Several files are chained
//! in the order given and addressed by a single global event index.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info};

use crate::core::binding::EventRecord;

/// Replayable, indexed access to raw event records.
pub trait EventSource {
    /// Total number of events.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the record at `index` (`0..len()`).
    fn fetch(&mut self, index: usize) -> Result<EventRecord>;
}

/// Position of one event line inside the chain.
#[derive(Debug, Clone, Copy)]
struct LineEntry {
    file: usize,
    offset: u64,
    /// 1-indexed, for error messages.
    line: usize,
}

/// JSON Lines files chained into one event sequence.
pub struct JsonlChain {
    paths: Vec<PathBuf>,
    readers: Vec<BufReader<File>>,
    entries: Vec<LineEntry>,
    buf: String,
}

impl JsonlChain {
    /// Open every input and index its event lines.
    ///
    /// Fails before indexing anything if any input cannot be opened.
    pub fn open(paths: &[PathBuf]) -> Result<Self> {
        if paths.is_empty() {
            bail!("no input files given");
        }

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let file = File::open(path)
                .with_context(|| format!("cannot open input file: {}", path.display()))?;
            files.push(file);
        }

        let mut readers = Vec::with_capacity(files.len());
        let mut entries = Vec::new();
        for (file_idx, file) in files.into_iter().enumerate() {
            let mut reader = BufReader::new(file);
            let before = entries.len();
            index_lines(&paths[file_idx], file_idx, &mut reader, &mut entries)?;
            info!(
                path = %paths[file_idx].display(),
                events = entries.len() - before,
                "loading input"
            );
            readers.push(reader);
        }

        Ok(Self {
            paths: paths.to_vec(),
            readers,
            entries,
            buf: String::new(),
        })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

fn index_lines(
    path: &Path,
    file_idx: usize,
    reader: &mut BufReader<File>,
    entries: &mut Vec<LineEntry>,
) -> Result<()> {
    let mut offset = 0u64;
    let mut line = String::new();
    let mut line_no = 0usize;
    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .with_context(|| format!("read {}", path.display()))?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if !line.trim().is_empty() {
            entries.push(LineEntry {
                file: file_idx,
                offset,
                line: line_no,
            });
        }
        offset += read as u64;
    }
    debug!(path = %path.display(), lines = line_no, "indexed input");
    Ok(())
}

impl EventSource for JsonlChain {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn fetch(&mut self, index: usize) -> Result<EventRecord> {
        let entry = *self
            .entries
            .get(index)
            .ok_or_else(|| anyhow!("event {} out of range (total {})", index, self.len()))?;
        let path = &self.paths[entry.file];
        let reader = &mut self.readers[entry.file];
        reader
            .seek(SeekFrom::Start(entry.offset))
            .with_context(|| format!("seek {}", path.display()))?;
        self.buf.clear();
        reader
            .read_line(&mut self.buf)
            .with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&self.buf)
            .with_context(|| format!("parse event at {}:{}", path.display(), entry.line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn event_line(met: f32, hl_triggers: u64) -> String {
        format!(r#"{{"nMUpart":0,"recoPFMET":{met:?},"HLTriggers":{hl_triggers}}}"#)
    }

    fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, lines.join("\n")).expect("write input");
        path
    }

    #[test]
    fn chains_files_in_order_and_skips_blank_lines() {
        let temp = tempfile::tempdir().expect("tempdir");
        let first = write_lines(
            temp.path(),
            "a.jsonl",
            &[&event_line(1.0, 0), "", &event_line(2.0, 0)],
        );
        let second = write_lines(temp.path(), "b.jsonl", &["  ", &event_line(3.0, 0)]);

        let mut chain = JsonlChain::open(&[first, second]).expect("open");
        assert_eq!(chain.len(), 3);
        let mets: Vec<f32> = (0..chain.len())
            .map(|i| chain.fetch(i).expect("fetch").met)
            .collect();
        assert_eq!(mets, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn fetch_is_replayable_out_of_order() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_lines(
            temp.path(),
            "a.jsonl",
            &[&event_line(0.0, 1), &event_line(0.0, 2)],
        );
        let mut chain = JsonlChain::open(&[path]).expect("open");
        assert_eq!(chain.fetch(1).expect("fetch").hl_triggers, 2);
        assert_eq!(chain.fetch(0).expect("fetch").hl_triggers, 1);
        assert_eq!(chain.fetch(1).expect("fetch").hl_triggers, 2);
        assert!(chain.fetch(2).is_err());
    }

    #[test]
    fn missing_input_is_reported_by_name() {
        let temp = tempfile::tempdir().expect("tempdir");
        let good = write_lines(temp.path(), "a.jsonl", &["{}"]);
        let missing = temp.path().join("missing.jsonl");
        let err = JsonlChain::open(&[good, missing.clone()])
            .err()
            .expect("missing input");
        assert!(err.to_string().contains("cannot open input file"));
        assert!(err.to_string().contains(&missing.display().to_string()));
    }

    #[test]
    fn empty_input_list_is_rejected() {
        assert!(JsonlChain::open(&[]).is_err());
    }

    #[test]
    fn parse_errors_name_file_and_line() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_lines(temp.path(), "a.jsonl", &[&event_line(0.0, 0), "", "{not json"]);
        let mut chain = JsonlChain::open(&[path]).expect("open");
        let err = chain.fetch(1).expect_err("bad json");
        assert!(err.to_string().contains("a.jsonl:3"));
    }

    #[test]
    fn missing_met_is_a_parse_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let no_met = r#"{"nMUpart":1,"HLTriggers":32,"muPt":[40.0],"muMt":[80.0]}"#;
        let path = write_lines(temp.path(), "a.jsonl", &[&event_line(1.0, 0), no_met]);
        let mut chain = JsonlChain::open(&[path]).expect("open");
        assert!(chain.fetch(0).is_ok());
        let err = chain.fetch(1).expect_err("missing recoPFMET");
        let message = format!("{err:#}");
        assert!(message.contains("a.jsonl:2"), "{message}");
        assert!(message.contains("recoPFMET"), "{message}");
    }
}
