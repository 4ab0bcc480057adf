//! Time trace scanning for mlx page allocation and release batches.
//!
//! The Mellanox driver logs one time trace record per page whenever its
//! per-channel page cache overflows or underflows. This module collapses
//! those records into batches per core and computes how much time they cost.
//!
//! # Usage
//!
//! ```ignore
//! use mlxalloc_trace::trace::{Reducer, analyze, render, render_annotation};
//!
//! let mut reducer = Reducer::new();
//! for line in input.lines() {
//!     for annotation in reducer.process_line(line)? {
//!         println!("{}", render_annotation(&annotation));
//!     }
//! }
//! println!("{}", render(&analyze(&reducer.finish())));
//! ```

pub mod analyze;
pub mod display;
mod error;
pub mod parse;
pub mod reduce;

// Re-export main types for convenience
pub use analyze::{BatchStats, TraceAnalysis, analyze};
pub use display::{render, render_annotation};
pub use error::TraceError;
pub use parse::{EventKind, TraceRecord, parse_line};
pub use reduce::{Annotation, Batch, BatchKind, Reducer, TraceSummary, reduce_lines};
