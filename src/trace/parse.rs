//! Parse Homa time trace lines into structured records.
//!
//! A record line looks like:
//!
//! ```text
//!   12.345 us (+   0.020 us) [C03] mlx starting page alloc id 1234
//! ```
//!
//! Only the leading timestamp, the bracketed core tag, and the free-text
//! message after it are used. Anything between ` us ` and the core tag is
//! ignored. Lines that don't have this shape (headers, blank lines) are not
//! records.

use std::sync::LazyLock;

use regex::Regex;

use super::TraceError;

/// Message marker for a single page allocation in the mlx driver.
pub const PAGE_ALLOC_MARKER: &str = "mlx starting page alloc";

/// Message marker for a single page release in the mlx driver.
pub const PAGE_RELEASE_MARKER: &str = "mlx starting page release";

static RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9.]+) us (?:.* )?\[(C[0-9]+)\] (.*)$").expect("valid record regex")
});

// Greedy prefix so the last `id N` in the message wins.
static REQUEST_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*id ([0-9.]+)").expect("valid request id regex"));

/// One timestamped record from a time trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord<'a> {
    /// Timestamp in microseconds
    pub time: f64,
    /// Core tag, e.g. `C3`
    pub core: &'a str,
    /// Everything after the core tag
    pub message: &'a str,
}

/// What a record says about page buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PageAlloc,
    PageRelease,
    Other,
}

impl<'a> TraceRecord<'a> {
    /// Classify the record by its message.
    pub fn kind(&self) -> EventKind {
        if self.message.contains(PAGE_ALLOC_MARKER) {
            EventKind::PageAlloc
        } else if self.message.contains(PAGE_RELEASE_MARKER) {
            EventKind::PageRelease
        } else {
            EventKind::Other
        }
    }

    /// The RPC id mentioned in the message, if any.
    pub fn request_id(&self) -> Option<&'a str> {
        REQUEST_ID_RE
            .captures(self.message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Parse a single line.
///
/// Returns `Ok(None)` for lines that aren't trace records. `line_number` is
/// only used for error reporting.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<TraceRecord<'_>>, TraceError> {
    let Some(caps) = RECORD_RE.captures(line) else {
        return Ok(None);
    };

    // All three groups are non-optional in the pattern.
    let (Some(time), Some(core), Some(message)) = (caps.get(1), caps.get(2), caps.get(3)) else {
        return Ok(None);
    };

    let time = time
        .as_str()
        .parse::<f64>()
        .map_err(|_| TraceError::InvalidTime {
            line: line_number,
            value: time.as_str().to_string(),
        })?;

    Ok(Some(TraceRecord {
        time,
        core: core.as_str(),
        message: message.as_str(),
    }))
}
