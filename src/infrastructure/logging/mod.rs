//! Operator-facing log output for a split run.
//!
//! Every event goes to stdout and, when the `logs/` directory is writable,
//! to a per-run log file. Both sinks share one bracketed line format.

mod formatter;
mod setup;

pub use setup::setup_logging;
