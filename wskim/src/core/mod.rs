//! Deterministic, pure selection logic.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! event views and return deterministic outputs suitable for tests.

pub mod binding;
pub mod cutflow;
pub mod decision;
pub mod isolation;
pub mod types;
