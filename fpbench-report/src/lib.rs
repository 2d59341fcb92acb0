#![warn(missing_docs)]
//! fpbench Report - Result Persistence
//!
//! Writes run results to a pre-existing output directory:
//! - `<dir>/<op>.csv`: one summary record (mean and std dev per backend)
//! - `<dir>/<backend>_<op>.csv`: optional raw per-call durations

mod record;
mod writer;

pub use record::{BackendColumn, SummaryRecord};
pub use writer::{ReportError, sample_dump_path, summary_path, write_samples, write_summary};

/// Extension of every file written by the reporter
pub const OUTPUT_EXTENSION: &str = "csv";
