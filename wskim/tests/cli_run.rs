//! CLI tests for `wskim run`, `wskim count` and `wskim config`.
//!
//! Spawns the binary against JSON Lines inputs and checks exit codes and the
//! written dataset.

use std::process::Command;

use wskim::core::isolation::IsolationCut;
use wskim::exit_codes;
use wskim::io::config::load_config;
use wskim::io::dataset_store::load_dataset;
use wskim::test_support::{MuonFields, event_record, muon, write_jsonl};

#[test]
fn run_writes_dataset_and_exits_ok() {
    let temp = tempfile::tempdir().expect("tempdir");
    let busy = MuonFields {
        track_iso: 10.0,
        ..muon(20.0, 55.0)
    };
    let first = write_jsonl(
        temp.path(),
        "a.jsonl",
        &[event_record(30.0, 1 << 5, &[muon(40.0, 80.0), busy])],
    )
    .expect("input a");
    let second = write_jsonl(
        temp.path(),
        "b.jsonl",
        &[event_record(12.0, 1 << 5, &[muon(25.0, 45.0)])],
    )
    .expect("input b");
    let output = temp.path().join("dataset.json");

    let status = Command::new(env!("CARGO_BIN_EXE_wskim"))
        .arg("run")
        .arg("-i")
        .arg(&first)
        .arg(&second)
        .arg("-o")
        .arg(&output)
        .args(["-c", "3"])
        .status()
        .expect("wskim run");
    assert_eq!(status.code(), Some(exit_codes::OK));

    let dataset = load_dataset(&output).expect("dataset");
    let pts: Vec<f32> = dataset.rows.iter().map(|row| row.pt).collect();
    assert_eq!(pts, vec![40.0, 25.0]);
    let names: Vec<&str> = dataset.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["TMass", "MET", "Pt", "Eta"]);
    assert_eq!(dataset.sources.len(), 2);
    assert_eq!(dataset.cutflow.candidates, 3);
    assert_eq!(dataset.cutflow.isolated, 2);
}

#[test]
fn corrupt_input_exits_with_corrupt_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut corrupt = event_record(30.0, 1 << 5, &[muon(40.0, 80.0)]);
    corrupt.n_mu = 3;
    let input = write_jsonl(temp.path(), "a.jsonl", &[corrupt]).expect("input");
    let output = temp.path().join("dataset.json");

    let result = Command::new(env!("CARGO_BIN_EXE_wskim"))
        .arg("run")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .output()
        .expect("wskim run");
    assert_eq!(result.status.code(), Some(exit_codes::CORRUPT));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("at event 0"), "stderr: {stderr}");
    assert!(!output.exists());
}

#[test]
fn missing_input_exits_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let status = Command::new(env!("CARGO_BIN_EXE_wskim"))
        .arg("run")
        .arg("-i")
        .arg(temp.path().join("missing.jsonl"))
        .arg("-o")
        .arg(temp.path().join("dataset.json"))
        .status()
        .expect("wskim run");
    assert_eq!(status.code(), Some(exit_codes::INVALID));
}

#[test]
fn usage_error_exits_invalid_not_corrupt() {
    let temp = tempfile::tempdir().expect("tempdir");
    let result = Command::new(env!("CARGO_BIN_EXE_wskim"))
        .arg("run")
        .arg("-o")
        .arg(temp.path().join("dataset.json"))
        .output()
        .expect("wskim run");
    assert_eq!(result.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("--input"), "stderr: {stderr}");
}

#[test]
fn help_exits_ok() {
    let result = Command::new(env!("CARGO_BIN_EXE_wskim"))
        .arg("--help")
        .output()
        .expect("wskim --help");
    assert_eq!(result.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&result.stdout).contains("Usage"));
}

#[test]
fn config_writes_effective_selection() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("selection.toml");
    let status = Command::new(env!("CARGO_BIN_EXE_wskim"))
        .arg("config")
        .arg("-o")
        .arg(&path)
        .args(["-c", "21", "--threshold", "0.15", "-m", "1", "-w", "0"])
        .status()
        .expect("wskim config");
    assert_eq!(status.code(), Some(exit_codes::OK));

    let cfg = load_config(&path).expect("load written config");
    assert_eq!(cfg.iso_cut, IsolationCut::PfFlooredNeutral);
    assert_eq!(cfg.threshold, 0.15);
    assert_eq!(cfg.trigger_index, 5);
    assert!(cfg.mc);
    assert!(!cfg.weight);
}

#[test]
fn count_prints_total_events() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = write_jsonl(
        temp.path(),
        "a.jsonl",
        &[
            event_record(1.0, 0, &[]),
            event_record(2.0, 0, &[muon(10.0, 20.0)]),
        ],
    )
    .expect("input");

    let result = Command::new(env!("CARGO_BIN_EXE_wskim"))
        .arg("count")
        .arg("-i")
        .arg(&input)
        .output()
        .expect("wskim count");
    assert_eq!(result.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&result.stdout).trim(), "2");
}
