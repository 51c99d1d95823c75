//! `wskim`: skim muon candidates from event files into an analysis dataset.

use std::path::PathBuf;

use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::error;

use wskim::core::binding::CandidateCountMismatch;
use wskim::core::isolation::IsolationCut;
use wskim::exit_codes;
use wskim::io::config::{SelectionConfig, load_config, write_config};
use wskim::skim::{SkimRequest, count_events, run_skim};

#[derive(Parser)]
#[command(
    name = "wskim",
    version,
    about = "Select tight, triggered, isolated muons into a dataset"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the selection and write the dataset.
    Run(RunArgs),
    /// Print the number of events across the inputs.
    Count {
        /// Input event files (JSON Lines), chained in order.
        #[arg(short = 'i', long = "input", num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Write the effective selection config (file + overrides) as TOML.
    Config {
        /// Destination config file.
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Input event files (JSON Lines), chained in order.
    #[arg(short = 'i', long = "input", num_args = 1.., required = true)]
    inputs: Vec<PathBuf>,

    /// Output dataset file.
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    #[command(flatten)]
    selection: SelectionArgs,
}

#[derive(clap::Args)]
struct SelectionArgs {
    /// Selection config (TOML). Command-line options override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Isolation cut type (0, 13, 14, 15, 2, 21, 3).
    #[arg(short = 'c', long = "iso-cut", allow_negative_numbers = true)]
    iso_cut: Option<i32>,

    /// Isolation threshold.
    #[arg(long)]
    threshold: Option<f32>,

    /// Trigger bit index.
    #[arg(long)]
    trigger_index: Option<u32>,

    /// Input is simulation (`-m 1`, `-m 0`; bare `-m` means 1).
    #[arg(
        short = 'm',
        long,
        value_name = "0|1",
        num_args = 0..=1,
        default_missing_value = "1",
        value_parser = BoolishValueParser::new()
    )]
    mc: Option<bool>,

    /// Apply event weights (`-w 1`, `-w 0`; bare `-w` means 1).
    #[arg(
        short = 'w',
        long,
        value_name = "0|1",
        num_args = 0..=1,
        default_missing_value = "1",
        value_parser = BoolishValueParser::new()
    )]
    weight: Option<bool>,
}

impl SelectionArgs {
    /// Merge file config with command-line overrides, then validate once.
    fn selection_config(&self) -> Result<SelectionConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_config(path)?,
            None => SelectionConfig::default(),
        };
        if let Some(id) = self.iso_cut {
            cfg.iso_cut = IsolationCut::from(id);
        }
        if let Some(threshold) = self.threshold {
            cfg.threshold = threshold;
        }
        if let Some(trigger_index) = self.trigger_index {
            cfg.trigger_index = trigger_index;
        }
        if let Some(mc) = self.mc {
            cfg.mc = mc;
        }
        if let Some(weight) = self.weight {
            cfg.weight = weight;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage errors must not share an exit code with corrupt input.
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_codes::OK,
                _ => exit_codes::INVALID,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    wskim::logging::init();
    let code = match run(cli) {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            if let Some(mismatch) = err.downcast_ref::<CandidateCountMismatch>() {
                error!(event = mismatch.event, "input is corrupt");
                exit_codes::CORRUPT
            } else {
                exit_codes::INVALID
            }
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run(args) => cmd_run(&args),
        Command::Count { inputs } => {
            println!("{}", count_events(&inputs)?);
            Ok(())
        }
        Command::Config { output, selection } => {
            let cfg = selection.selection_config()?;
            write_config(&output, &cfg)?;
            println!("config: output={}", output.display());
            Ok(())
        }
    }
}

fn cmd_run(args: &RunArgs) -> Result<()> {
    let request = SkimRequest {
        inputs: args.inputs.clone(),
        output: args.output.clone(),
        config: args.selection.selection_config()?,
    };
    let summary = run_skim(&request)?;
    println!(
        "run: events={} selected={} output={}",
        summary.events,
        summary.selected,
        summary.output.display()
    );
    Ok(())
}
