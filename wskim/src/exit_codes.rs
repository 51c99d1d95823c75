//! Stable exit codes for `wskim` commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid options or config, unreadable inputs, or any other failure.
pub const INVALID: i32 = 1;
/// An event's declared muon count disagrees with its arrays; the input is corrupt.
pub const CORRUPT: i32 = 2;
