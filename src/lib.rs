pub mod styling;
pub mod trace;

pub use trace::{Reducer, TraceError};
