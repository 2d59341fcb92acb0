//! Summary Record

use fpbench_stats::SummaryStatistics;
use std::fmt;

/// Mean and standard deviation of one backend
#[derive(Debug, Clone, PartialEq)]
pub struct BackendColumn {
    /// Backend label (e.g. `native`, `mpfr`)
    pub backend: String,
    /// Mean latency in nanoseconds
    pub mean: f64,
    /// Sample standard deviation in nanoseconds
    pub std_dev: f64,
}

/// One output line: the operation name followed by a (mean, std dev) pair
/// per backend, in measurement order
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    /// Operation name
    pub operation: String,
    /// Backend columns, in fixed order
    pub columns: Vec<BackendColumn>,
}

impl SummaryRecord {
    /// Empty record for `operation`
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            columns: Vec::new(),
        }
    }

    /// Append a backend column
    pub fn push(&mut self, backend: impl Into<String>, stats: &SummaryStatistics) {
        self.columns.push(BackendColumn {
            backend: backend.into(),
            mean: stats.mean,
            std_dev: stats.std_dev,
        });
    }

    /// Render as `<op>, <mean>, <std>, ...`.
    ///
    /// Means carry one decimal place; standard deviations use the shortest
    /// representation that round-trips, so integral values print without a
    /// decimal point (`0`, `10`). No trailing newline.
    pub fn to_csv_line(&self) -> String {
        let mut line = self.operation.clone();
        for column in &self.columns {
            line.push_str(&format!(", {:.1}, {}", column.mean, column.std_dev));
        }
        line
    }
}

impl fmt::Display for SummaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_csv_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpbench_stats::compute_summary;

    fn record(op: &str, backends: &[&str]) -> SummaryRecord {
        let stats = compute_summary(&[10, 20, 30]);
        let mut record = SummaryRecord::new(op);
        for backend in backends {
            record.push(*backend, &stats);
        }
        record
    }

    #[test]
    fn test_csv_line_format() {
        let record = record("add", &["native", "mpfr", "micro"]);
        assert_eq!(record.to_csv_line(), "add, 20.0, 10, 20.0, 10, 20.0, 10");
        assert_eq!(record.to_string(), record.to_csv_line());
    }

    #[test]
    fn test_field_counts() {
        let primitive = record("mul", &["native", "mpfr", "micro"]).to_csv_line();
        assert_eq!(primitive.split(", ").count(), 1 + 6);

        let transcendental = record("sin", &["native", "strict", "mpfr", "micro"]).to_csv_line();
        assert_eq!(transcendental.split(", ").count(), 1 + 8);
    }

    #[test]
    fn test_mean_rounding_and_full_std_dev() {
        let mut record = SummaryRecord::new("log");
        record.push("native", &compute_summary(&[1, 2]));
        // mean 1.5, std dev 1/sqrt(2)
        assert_eq!(record.to_csv_line(), "log, 1.5, 0.7071067811865476");
    }
}
