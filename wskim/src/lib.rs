//! Muon candidate selection over recorded or simulated events.
//!
//! Each event's muon candidates are tested for tight quality, a trigger match
//! and isolation; the survivors' transverse mass, missing transverse energy,
//! transverse momentum and pseudorapidity are collected into a dataset.
//!
//! - **[`core`]**: Pure, deterministic logic (binding, isolation, decisions).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting collaborators (config file, event source,
//!   dataset file).
//!
//! Orchestration modules ([`selection`], [`skim`]) coordinate core logic with
//! I/O to implement CLI commands.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod selection;
pub mod skim;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
