//! Benchmark flow
//!
//! Times the subject over every benchmark fixture and appends one block per
//! successful run to a timestamped report file. Fixtures that write to
//! stderr are reported inline and left out of the report.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::HarnessConfig;
use crate::error::HarnessResult;
use crate::fixture::discover_fixtures;
use crate::report::{BenchmarkRecord, ReportWriter, truncate};
use crate::runner::run_subject;

/// Characters of stderr shown for a failed benchmark.
pub const ERROR_PREVIEW_CHARS: usize = 32;

/// What a benchmark run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchSummary {
    pub report: PathBuf,
    pub recorded: usize,
    pub errors: usize,
}

/// Benchmark every fixture under the configured root, printing progress to `console`.
#[tracing::instrument(skip_all, fields(root = %config.fixture_root.display()))]
pub fn run_benchmarks<W: Write>(config: &HarnessConfig, subject: &Path, console: &mut W) -> HarnessResult<BenchSummary> {
    let started = Local::now();
    let fixtures = discover_fixtures(&config.fixture_root, &config.extensions)?;
    let mut report = ReportWriter::create(
        &config.results_dir,
        &config.report_prefix,
        &started,
        config.report_banner_width,
    )?;

    let mut errors = 0;
    for path in fixtures {
        let _ = write!(console, "{} -> ", path.display());
        let _ = console.flush();

        let result = match run_subject(subject, &path, config.timeout) {
            Ok(result) => result,
            Err(e) => {
                errors += 1;
                let _ = writeln!(console, "error at {}: {e}", path.display());
                continue;
            }
        };

        if !result.stderr.is_empty() {
            errors += 1;
            let _ = writeln!(
                console,
                "error at {}: {}",
                path.display(),
                truncate(&result.stderr, ERROR_PREVIEW_CHARS)
            );
            continue;
        }

        tracing::debug!(
            fixture = %path.display(),
            report = %report.path().display(),
            elapsed_ms = result.elapsed.as_millis() as u64,
            "recording benchmark"
        );
        report.append(&BenchmarkRecord {
            fixture: path,
            elapsed: result.elapsed,
            stdout: result.stdout,
        })?;
        let _ = writeln!(console, "done!");
    }

    let recorded = report.records();
    let report = report.finish()?;
    let _ = writeln!(console, "all done!");

    Ok(BenchSummary {
        report,
        recorded,
        errors,
    })
}
