//! Benchmark report file
//!
//! One block per benchmarked fixture:
//!
//! ```text
//! =================================== a/b.eulb ===================================
//! pytime:
//! 0.0123
//!
//! program stdout:
//! 42
//!
//! ```

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};

use super::cover;
use crate::error::{HarnessError, HarnessResult};

const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M";
const BANNER_FILL: char = '=';

/// Timing of one successful subject run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkRecord {
    pub fixture: PathBuf,
    pub elapsed: Duration,
    pub stdout: String,
}

impl BenchmarkRecord {
    /// Render the report block with a banner `width` characters wide.
    pub fn render(&self, width: usize) -> String {
        RenderedRecord { record: self, width }.to_string()
    }
}

struct RenderedRecord<'a> {
    record: &'a BenchmarkRecord,
    width: usize,
}

impl fmt::Display for RenderedRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let banner = cover(&self.record.fixture.display().to_string(), self.width, BANNER_FILL);
        writeln!(f, "{banner}")?;
        writeln!(f, "pytime:")?;
        writeln!(f, "{}", self.record.elapsed.as_secs_f64())?;
        writeln!(f)?;
        writeln!(f, "program stdout:")?;
        writeln!(f, "{}", self.record.stdout)
    }
}

/// `{prefix}_{YYYY_MM_DD_HH_MM}.txt` for a run started at `started`.
pub fn report_file_name(prefix: &str, started: &DateTime<Local>) -> String {
    format!("{prefix}_{}.txt", started.format(TIMESTAMP_FORMAT))
}

/// Buffered writer for one run's report file.
///
/// The file is created once per run. Dropping the writer flushes whatever
/// was buffered; [`ReportWriter::finish`] flushes and surfaces errors.
pub struct ReportWriter {
    path: PathBuf,
    out: BufWriter<File>,
    width: usize,
    records: usize,
}

impl ReportWriter {
    /// Create a fresh report file in `dir`, never replacing an existing one.
    pub fn create(dir: &Path, prefix: &str, started: &DateTime<Local>, width: usize) -> HarnessResult<Self> {
        fs::create_dir_all(dir).map_err(|source| HarnessError::Report {
            path: dir.to_path_buf(),
            source,
        })?;

        let base = report_file_name(prefix, started);
        let stem = base.trim_end_matches(".txt");
        let mut path = dir.join(&base);
        let mut attempt = 0usize;
        let file = loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    attempt += 1;
                    path = dir.join(format!("{stem}_{attempt}.txt"));
                }
                Err(source) => return Err(HarnessError::Report { path, source }),
            }
        };

        tracing::info!(path = %path.display(), "writing benchmark report");
        Ok(Self {
            path,
            out: BufWriter::new(file),
            width,
            records: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of blocks written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Append one block.
    pub fn append(&mut self, record: &BenchmarkRecord) -> HarnessResult<()> {
        self.out
            .write_all(record.render(self.width).as_bytes())
            .map_err(|source| HarnessError::Report {
                path: self.path.clone(),
                source,
            })?;
        self.records += 1;
        Ok(())
    }

    /// Flush and close the report, returning its path.
    pub fn finish(mut self) -> HarnessResult<PathBuf> {
        self.out.flush().map_err(|source| HarnessError::Report {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.path)
    }
}
