//! Display formatting for verbose traces and the aggregate report.
//!
//! Field widths follow the layout scripts downstream of this tool already
//! parse, so changes here are breaking.

use super::analyze::{BatchStats, TraceAnalysis};
use super::reduce::{Annotation, BatchKind};
use std::fmt::Write as _;

/// Render one annotation as a line of the collapsed trace (no newline).
pub fn render_annotation(annotation: &Annotation<'_>) -> String {
    match annotation {
        Annotation::Passthrough(line) => (*line).to_string(),
        Annotation::Batch {
            time,
            delta,
            core,
            kind,
            batch,
        } => {
            let verb = match kind {
                BatchKind::Alloc => "allocated",
                BatchKind::Free => "freed",
            };
            format!(
                "{time:9.3} us (+{delta:8.3} us) [{core}] mlx {verb} {} pages ({:.1} us)",
                batch.pages, batch.elapsed
            )
        }
        Annotation::Record {
            time,
            delta,
            core,
            message,
        } => format!("{time:9.3} us (+{delta:8.3} us) [{core}] {message}"),
    }
}

/// Render the complete aggregate report to a string.
pub fn render(analysis: &TraceAnalysis) -> String {
    let mut out = String::new();

    writeln!(out, "Total number of RPCs: {:6}", analysis.request_count).unwrap();
    writeln!(out, "Total elapsed time:   {:8.1} us", analysis.elapsed).unwrap();
    out.push('\n');

    match &analysis.allocs {
        Some(stats) => render_batch_stats(&mut out, "Page allocations", "Alloc", stats),
        None => out.push_str("No page allocations\n"),
    }
    match &analysis.frees {
        Some(stats) => render_batch_stats(&mut out, "Page frees", "Free", stats),
        None => out.push_str("No page frees\n"),
    }

    out
}

fn render_batch_stats(out: &mut String, title: &str, verb: &str, stats: &BatchStats) {
    writeln!(out, "{title}:").unwrap();
    writeln!(out, "  Total pages:        {:6}", stats.total_pages).unwrap();
    writeln!(out, "  Batches:             {:5}", stats.batches).unwrap();
    writeln!(out, "  Average batch size:  {:7.1}", stats.average_size).unwrap();
    writeln!(out, "  Average batch time:  {:7.1} us", stats.average_time).unwrap();
    // Pad the label so both variants line up with the other fields.
    let per_request = format!("{verb} time per RPC:");
    writeln!(
        out,
        "  {per_request:<20} {:7.1} us",
        stats.time_per_request
    )
    .unwrap();
    writeln!(
        out,
        "  Total time:          {:7.1} us ({:.3} core)",
        stats.total_time, stats.core_fraction
    )
    .unwrap();
}
