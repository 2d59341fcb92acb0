#![warn(missing_docs)]
//! fpbench Statistics
//!
//! Reduces per-call latency sequences to summary statistics:
//! - Arithmetic mean and Bessel-corrected sample standard deviation
//! - Extremes, median and p99 from the raw samples
//! - Parallel reduction of several sequences at once

mod percentiles;
mod summary;

pub use percentiles::compute_percentile;
pub use summary::{SummaryStatistics, compute_summaries, compute_summary};
