//! Turn collected batches into the numbers the report prints.

use super::reduce::{Batch, TraceSummary};

/// Summary statistics for one kind of batch (allocations or frees).
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStats {
    pub total_pages: usize,
    pub batches: usize,
    pub average_size: f64,
    /// Microseconds
    pub average_time: f64,
    /// Microseconds of batch time per distinct RPC
    pub time_per_request: f64,
    /// Microseconds
    pub total_time: f64,
    /// Fraction of one core spent in batches over the elapsed time
    pub core_fraction: f64,
}

/// Statistics for allocation and free batches.
///
/// A side is `None` when the trace had no batches of that kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceAnalysis {
    pub request_count: usize,
    pub elapsed: f64,
    pub allocs: Option<BatchStats>,
    pub frees: Option<BatchStats>,
}

/// Analyze a finished scan.
pub fn analyze(summary: &TraceSummary) -> TraceAnalysis {
    TraceAnalysis {
        request_count: summary.request_count,
        elapsed: summary.elapsed,
        allocs: compute_batch_stats(&summary.alloc_batches, summary),
        frees: compute_batch_stats(&summary.free_batches, summary),
    }
}

/// Compute stats for one batch list. Empty lists have no stats.
///
/// Per-RPC and per-core ratios are plain float divisions: with no RPC ids or
/// zero elapsed time they come out as `inf` or `NaN`.
fn compute_batch_stats(batches: &[Batch], summary: &TraceSummary) -> Option<BatchStats> {
    if batches.is_empty() {
        return None;
    }

    let count = batches.len() as f64;
    let total_pages: usize = batches.iter().map(|b| b.pages).sum();
    let total_time: f64 = batches.iter().map(|b| b.elapsed).sum();

    Some(BatchStats {
        total_pages,
        batches: batches.len(),
        average_size: total_pages as f64 / count,
        average_time: total_time / count,
        time_per_request: total_time / summary.request_count as f64,
        total_time,
        core_fraction: total_time / summary.elapsed,
    })
}
