//! Diagnostic tracing for `wskim`.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: options, progress, cut flow and per-candidate
//!   decisions via `RUST_LOG`, output to stderr.
//!
//! - **Product output**: the dataset file and the `count` result on stdout.
//!   Unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` env var. Defaults to `info` if unset so progress is shown.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=wskim=trace wskim run -i events.jsonl -o dataset.json -c 13
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
