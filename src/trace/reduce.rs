//! Collapse consecutive page alloc/release records into per-core batches.
//!
//! The mlx driver logs one record per page when its per-channel cache over-
//! or underflows. A batch is the run of such records on one core that ends at
//! the next record of any other kind on that core. Records on other cores do
//! not end a run.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::TraceError;
use super::parse::{EventKind, parse_line};

/// Kind of page operation a batch is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Alloc,
    Free,
}

/// A finished batch: how many pages, and the time from first to last record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Batch {
    pub pages: usize,
    pub elapsed: f64,
}

/// An open run of page records on one core.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Run {
    pages: usize,
    first: f64,
    last: f64,
}

impl Run {
    fn start(time: f64) -> Self {
        Self {
            pages: 1,
            first: time,
            last: time,
        }
    }

    fn extend(&mut self, time: f64) {
        self.pages += 1;
        self.last = time;
    }

    fn into_batch(self) -> Batch {
        Batch {
            pages: self.pages,
            elapsed: self.last - self.first,
        }
    }
}

/// Open runs for one core. `None` means no run in progress.
#[derive(Debug, Clone, Default)]
struct CoreState {
    alloc: Option<Run>,
    free: Option<Run>,
}

fn push_page(run: &mut Option<Run>, time: f64) {
    match run {
        Some(run) => run.extend(time),
        None => *run = Some(Run::start(time)),
    }
}

/// What the scan has to say about one input line, in output order.
///
/// Verbose output prints each of these; aggregate mode ignores them.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation<'a> {
    /// A line that isn't a trace record, echoed as-is
    Passthrough(&'a str),
    /// A run closed by the current record
    Batch {
        time: f64,
        delta: f64,
        core: &'a str,
        kind: BatchKind,
        batch: Batch,
    },
    /// A record other than a page alloc/release
    Record {
        time: f64,
        delta: f64,
        core: &'a str,
        message: &'a str,
    },
}

/// Scan state for one trace. Feed lines in order, then call [`Reducer::finish`].
#[derive(Debug, Default)]
pub struct Reducer {
    cores: IndexMap<String, CoreState>,
    alloc_batches: Vec<Batch>,
    free_batches: Vec<Batch>,
    request_ids: HashSet<String>,
    prev_time: f64,
    lines: usize,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process the next line of the trace.
    ///
    /// Page alloc/release records only extend the core's open run and produce
    /// nothing. Any other record closes that core's open runs (alloc first)
    /// and is then reported itself.
    pub fn process_line<'a>(&mut self, line: &'a str) -> Result<Vec<Annotation<'a>>, TraceError> {
        self.lines += 1;

        let Some(record) = parse_line(line, self.lines)? else {
            log::trace!("line {}: not a trace record", self.lines);
            return Ok(vec![Annotation::Passthrough(line)]);
        };

        if let Some(id) = record.request_id()
            && !self.request_ids.contains(id)
        {
            self.request_ids.insert(id.to_string());
        }

        let time = record.time;
        let core = self.cores.entry(record.core.to_string()).or_default();

        match record.kind() {
            EventKind::PageAlloc => {
                push_page(&mut core.alloc, time);
                return Ok(Vec::new());
            }
            EventKind::PageRelease => {
                push_page(&mut core.free, time);
                return Ok(Vec::new());
            }
            EventKind::Other => {}
        }

        let mut out = Vec::with_capacity(3);
        let closed = [
            (BatchKind::Alloc, core.alloc.take()),
            (BatchKind::Free, core.free.take()),
        ];
        for (kind, run) in closed {
            let Some(run) = run else { continue };
            let batch = run.into_batch();
            log::debug!(
                "{} {kind:?} batch closed at {time}: {} pages over {} us",
                record.core,
                batch.pages,
                batch.elapsed
            );
            match kind {
                BatchKind::Alloc => self.alloc_batches.push(batch),
                BatchKind::Free => self.free_batches.push(batch),
            }
            out.push(Annotation::Batch {
                time,
                delta: time - self.prev_time,
                core: record.core,
                kind,
                batch,
            });
            self.prev_time = time;
        }

        out.push(Annotation::Record {
            time,
            delta: time - self.prev_time,
            core: record.core,
            message: record.message,
        });
        Ok(out)
    }

    /// Finish the scan. Runs still open at end of input are dropped.
    pub fn finish(self) -> TraceSummary {
        let open = self
            .cores
            .values()
            .filter(|c| c.alloc.is_some() || c.free.is_some())
            .count();
        if open > 0 {
            log::debug!("{open} core(s) had unfinished page runs at end of trace");
        }

        TraceSummary {
            request_count: self.request_ids.len(),
            elapsed: self.prev_time,
            alloc_batches: self.alloc_batches,
            free_batches: self.free_batches,
        }
    }
}

/// Everything the aggregate report needs once the scan is done.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSummary {
    /// Number of distinct RPC ids seen
    pub request_count: usize,
    /// Time of the last flushed batch, in microseconds
    pub elapsed: f64,
    pub alloc_batches: Vec<Batch>,
    pub free_batches: Vec<Batch>,
}

/// Run a whole trace through a fresh [`Reducer`].
pub fn reduce_lines(input: &str) -> Result<TraceSummary, TraceError> {
    let mut reducer = Reducer::new();
    for line in input.lines() {
        reducer.process_line(line)?;
    }
    Ok(reducer.finish())
}
