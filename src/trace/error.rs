//! Errors raised while scanning a time trace.
//!
//! These are domain errors that callers can pattern-match; the binary wraps
//! them in `anyhow::Error` alongside I/O context.

/// A trace line that looks like a record but can't be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraceError {
    /// The timestamp field matched `[0-9.]+` but isn't a number (e.g. `1.2.3`)
    #[error("line {line}: invalid timestamp '{value}'")]
    InvalidTime { line: usize, value: String },
}
