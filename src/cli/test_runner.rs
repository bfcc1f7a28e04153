//! Conformance test flow
//!
//! For every discovered fixture: parse its annotations, run the subject,
//! compare, report. Anything that goes wrong with a single fixture (an
//! unreadable file, a spawn failure, a timeout, a mismatch) becomes a failed
//! outcome for that fixture and the run continues.
//!
//! ## TestReporter Trait
//!
//! Reporting is separated from execution through [`TestReporter`], so the
//! console layout can be swapped (or captured in tests) without touching the
//! run loop.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::compare::{Outcome, compare};
use crate::config::HarnessConfig;
use crate::error::HarnessResult;
use crate::fixture::{AnnotationParser, Fixture, discover_fixtures};
use crate::report::cover;
use crate::runner::run_subject;

// ============================================================================
// Tally
// ============================================================================

/// Pass/fail counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTally {
    pub passed: usize,
    pub failed: usize,
}

impl RunTally {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Receives run events in order.
pub trait TestReporter {
    /// Called once before the first fixture runs
    fn on_run_start(&mut self) {}

    /// Called after each fixture has been checked
    fn on_fixture_complete(&mut self, path: &Path, outcome: &Outcome);

    /// Called once after the corpus is exhausted
    fn on_run_complete(&mut self, tally: &RunTally);
}

/// Line-oriented console output.
///
/// ```text
/// ======== tests =========
/// tests/closures.eult -> ok
/// tests/strings.eult -> error: want 2 lines, got 1
/// ======== result ========
/// error [1]
/// ```
pub struct ConsoleReporter<W: Write> {
    out: W,
    banner_width: usize,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(banner_width: usize) -> Self {
        Self::new(io::stdout(), banner_width)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, banner_width: usize) -> Self {
        Self { out, banner_width }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Console write failures (e.g. a closed pipe) must not abort the run.
    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_run_start(&mut self) {
        let banner = cover("tests", self.banner_width, '=');
        self.line(&banner);
    }

    fn on_fixture_complete(&mut self, path: &Path, outcome: &Outcome) {
        self.line(&format!("{} -> {outcome}", path.display()));
    }

    fn on_run_complete(&mut self, tally: &RunTally) {
        let banner = cover("result", self.banner_width, '=');
        self.line(&banner);
        if tally.has_failures() {
            self.line(&format!("error [{}]", tally.failed));
        } else {
            self.line("ok");
        }
        let _ = self.out.flush();
    }
}

// ============================================================================
// Run loop
// ============================================================================

/// Run every fixture under the configured root against `subject`.
///
/// Returns the tally; fatal configuration problems (missing root, invalid
/// comment pattern) are errors before any fixture runs.
#[tracing::instrument(skip_all, fields(root = %config.fixture_root.display()))]
pub fn run_tests(config: &HarnessConfig, subject: &Path, reporter: &mut dyn TestReporter) -> HarnessResult<RunTally> {
    let parser = AnnotationParser::new(&config.comment_prefix)?;
    let fixtures = discover_fixtures(&config.fixture_root, &config.extensions)?;

    reporter.on_run_start();
    let mut tally = RunTally::default();
    for path in fixtures {
        let outcome = check_fixture(&parser, subject, &path, config.timeout);
        tracing::debug!(fixture = %path.display(), passed = outcome.is_pass(), "fixture checked");
        tally.record(&outcome);
        reporter.on_fixture_complete(&path, &outcome);
    }
    reporter.on_run_complete(&tally);

    Ok(tally)
}

/// Check one fixture. Every per-fixture failure funnels into `Outcome::Fail` here.
pub fn check_fixture(parser: &AnnotationParser, subject: &Path, path: &Path, timeout: Option<Duration>) -> Outcome {
    let fixture = match Fixture::load(path) {
        Ok(fixture) => fixture,
        Err(e) => return Outcome::Fail(format!("cannot read fixture: {e}")),
    };
    let expectations = parser.parse(&fixture.source);

    match run_subject(subject, &fixture.path, timeout) {
        Ok(result) => compare(&result, &expectations),
        Err(e) => Outcome::Fail(e.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn captured(events: impl FnOnce(&mut ConsoleReporter<Vec<u8>>)) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new(), 24);
        events(&mut reporter);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_tally_counts() {
        let mut tally = RunTally::default();
        tally.record(&Outcome::Pass);
        tally.record(&Outcome::Fail("x".into()));
        tally.record(&Outcome::Fail("y".into()));
        assert_eq!(tally, RunTally { passed: 1, failed: 2 });
        assert_eq!(tally.total(), 3);
        assert!(tally.has_failures());
        assert!(!RunTally::default().has_failures());
    }

    #[test]
    fn test_console_reporter_passing_run() {
        let text = captured(|r| {
            r.on_run_start();
            r.on_fixture_complete(&PathBuf::from("tests/a.eult"), &Outcome::Pass);
            r.on_run_complete(&RunTally { passed: 1, failed: 0 });
        });
        insta::assert_snapshot!(text, @r"
        ======== tests =========
        tests/a.eult -> ok
        ======== result ========
        ok
        ");
    }

    #[test]
    fn test_console_reporter_failing_run() {
        let text = captured(|r| {
            r.on_run_start();
            r.on_fixture_complete(&PathBuf::from("tests/a.eult"), &Outcome::Pass);
            r.on_fixture_complete(
                &PathBuf::from("tests/b.eult"),
                &Outcome::Fail("want 1 lines, got 0".to_string()),
            );
            r.on_run_complete(&RunTally { passed: 1, failed: 1 });
        });
        insta::assert_snapshot!(text, @r"
        ======== tests =========
        tests/a.eult -> ok
        tests/b.eult -> error: want 1 lines, got 0
        ======== result ========
        error [1]
        ");
    }

    #[cfg(unix)]
    #[test]
    fn test_check_fixture_unreadable_file_fails() {
        let parser = AnnotationParser::new("#").unwrap();
        let outcome = check_fixture(&parser, Path::new("/bin/sh"), Path::new("/nonexistent/x.eult"), None);
        assert!(matches!(outcome, Outcome::Fail(reason) if reason.starts_with("cannot read fixture")));
    }
}
