//! Output Files
//!
//! Every file is created (or truncated) inside a directory that must already
//! exist; the writer never creates directories. Any failure carries the path
//! and the underlying OS error, and no partial-write recovery is attempted.

use crate::OUTPUT_EXTENSION;
use crate::record::SummaryRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while persisting results
#[derive(Debug, Error)]
pub enum ReportError {
    /// Creating or writing a file failed
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// File being written
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
}

/// `<dir>/<op>.csv`
pub fn summary_path(dir: &Path, operation: &str) -> PathBuf {
    dir.join(format!("{}.{}", operation, OUTPUT_EXTENSION))
}

/// `<dir>/<backend>_<op>.csv`
pub fn sample_dump_path(dir: &Path, backend: &str, operation: &str) -> PathBuf {
    dir.join(format!("{}_{}.{}", backend, operation, OUTPUT_EXTENSION))
}

fn write_lines<F>(path: PathBuf, fill: F) -> Result<PathBuf, ReportError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let result = File::create(&path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        fill(&mut writer)?;
        writer.flush()
    });

    match result {
        Ok(()) => Ok(path),
        Err(source) => Err(ReportError::Io { path, source }),
    }
}

/// Write the single summary line for `record` and return the file path
pub fn write_summary(dir: &Path, record: &SummaryRecord) -> Result<PathBuf, ReportError> {
    let path = summary_path(dir, &record.operation);
    write_lines(path, |w| writeln!(w, "{}", record.to_csv_line()))
}

/// Write one raw duration per line and return the file path
pub fn write_samples(
    dir: &Path,
    backend: &str,
    operation: &str,
    samples: &[u64],
) -> Result<PathBuf, ReportError> {
    let path = sample_dump_path(dir, backend, operation);
    write_lines(path, |w| {
        for sample in samples {
            writeln!(w, "{}", sample)?;
        }
        Ok(())
    })
}
