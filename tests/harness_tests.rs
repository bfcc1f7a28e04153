//! End-to-end tests for the test and benchmark flows
//!
//! `/bin/sh` stands in for the subject: each fixture is a shell script, and
//! since `#` starts a comment in both sh and eule the annotations are written
//! exactly as in the eule corpus.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eule_harness::cli::bench_runner::run_benchmarks;
use eule_harness::cli::test_runner::{ConsoleReporter, RunTally, TestReporter, run_tests};
use eule_harness::{HarnessConfig, HarnessError, Outcome, cover};
use tempfile::{TempDir, tempdir};

const SH: &str = "/bin/sh";

/// Reporter that keeps every outcome for inspection.
#[derive(Default)]
struct Recorder {
    outcomes: Vec<(PathBuf, Outcome)>,
    finished: Option<RunTally>,
}

impl TestReporter for Recorder {
    fn on_fixture_complete(&mut self, path: &Path, outcome: &Outcome) {
        self.outcomes.push((path.to_path_buf(), outcome.clone()));
    }

    fn on_run_complete(&mut self, tally: &RunTally) {
        self.finished = Some(*tally);
    }
}

impl Recorder {
    fn outcome(&self, name: &str) -> &Outcome {
        &self
            .outcomes
            .iter()
            .find(|(path, _)| path.ends_with(name))
            .unwrap_or_else(|| panic!("no outcome for {name}"))
            .1
    }
}

fn corpus(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (name, body) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }
    dir
}

fn test_config(root: &Path) -> HarnessConfig {
    HarnessConfig::tests()
        .with_fixture_root(root)
        .with_timeout(Some(Duration::from_secs(5)))
}

fn run(config: &HarnessConfig) -> (RunTally, Recorder) {
    let mut recorder = Recorder::default();
    let tally = run_tests(config, Path::new(SH), &mut recorder).unwrap();
    (tally, recorder)
}

#[test]
fn test_matching_output_is_ok() {
    let dir = corpus(&[("print.eult", "# out:a\n# out:b\nprintf 'a\\nb\\n'\n")]);
    let (tally, recorder) = run(&test_config(dir.path()));
    assert_eq!(tally, RunTally { passed: 1, failed: 0 });
    assert_eq!(recorder.outcome("print.eult"), &Outcome::Pass);
}

#[test]
fn test_wildcard_error_accepts_any_message() {
    let dir = corpus(&[("bad.eult", "# err:...\necho 'boom: parse error' >&2\nexit 1\n")]);
    let (tally, recorder) = run(&test_config(dir.path()));
    assert!(!tally.has_failures());
    assert_eq!(recorder.outcome("bad.eult"), &Outcome::Pass);
}

#[test]
fn test_missing_output_fails_with_line_count() {
    let dir = corpus(&[("silent.eult", "# out:x\n")]);
    let (tally, recorder) = run(&test_config(dir.path()));
    assert_eq!(tally.failed, 1);
    assert_eq!(
        recorder.outcome("silent.eult"),
        &Outcome::Fail("want 1 lines, got 0".to_string())
    );
    assert_eq!(recorder.finished, Some(tally));
}

#[test]
fn test_exact_error_mismatch_quotes_both() {
    let dir = corpus(&[(
        "div.eult",
        "# err:runtime error: division by zero\necho 'runtime error: bad operand' >&2\necho '  ln 1: fn script' >&2\n",
    )]);
    let (_, recorder) = run(&test_config(dir.path()));
    assert_eq!(
        recorder.outcome("div.eult"),
        &Outcome::Fail("expected 'runtime error: division by zero', got 'runtime error: bad operand'".to_string())
    );
}

#[test]
fn test_stderr_takes_precedence_over_output_expectation() {
    let dir = corpus(&[("noisy.eult", "# out:a\necho a\necho 'warning' >&2\n")]);
    let (tally, recorder) = run(&test_config(dir.path()));
    assert_eq!(tally.failed, 1);
    assert_eq!(
        recorder.outcome("noisy.eult"),
        &Outcome::Fail("expected '', got 'warning'".to_string())
    );
}

#[test]
fn test_timeout_is_a_fixture_failure_and_run_continues() {
    let dir = corpus(&[
        ("a_slow.eult", "# out:never\nexec sleep 10\n"),
        ("b_fast.eult", "# out:1\necho 1\n"),
    ]);
    let config = test_config(dir.path()).with_timeout(Some(Duration::from_millis(200)));
    let (tally, recorder) = run(&config);

    assert_eq!(tally, RunTally { passed: 1, failed: 1 });
    assert_eq!(recorder.outcome("a_slow.eult"), &Outcome::Fail("timeout after 200ms".to_string()));
    assert_eq!(recorder.outcome("b_fast.eult"), &Outcome::Pass);
}

#[test]
fn test_only_configured_extensions_run() {
    let dir = corpus(&[
        ("t.eult", "# out:t\necho t\n"),
        ("b.eulb", "echo bench\n"),
        ("nested/deeper/t2.eult", "# out:t2\necho t2\n"),
    ]);
    let (tally, recorder) = run(&test_config(dir.path()));
    assert_eq!(tally.total(), 2);
    assert!(recorder.outcomes.iter().all(|(p, _)| p.extension().unwrap() == "eult"));
}

#[test]
fn test_missing_root_aborts_before_running() {
    let dir = tempdir().unwrap();
    let config = test_config(&dir.path().join("missing"));
    let mut recorder = Recorder::default();
    let err = run_tests(&config, Path::new(SH), &mut recorder).unwrap_err();
    assert!(matches!(err, HarnessError::Discovery { .. }));
    assert!(recorder.outcomes.is_empty());
    assert!(recorder.finished.is_none());
}

#[test]
fn test_invalid_comment_prefix_aborts() {
    let dir = corpus(&[("x.eult", "echo\n")]);
    let config = test_config(dir.path()).with_comment_prefix("[");
    let mut recorder = Recorder::default();
    let err = run_tests(&config, Path::new(SH), &mut recorder).unwrap_err();
    assert!(matches!(err, HarnessError::InvalidPattern { .. }));
}

#[test]
fn test_missing_subject_fails_each_fixture() {
    let dir = corpus(&[("a.eult", "# out:a\n"), ("b.eult", "# out:b\n")]);
    let config = test_config(dir.path());
    let mut recorder = Recorder::default();
    let tally = run_tests(&config, &dir.path().join("no-subject"), &mut recorder).unwrap();
    assert_eq!(tally.failed, 2);
    assert!(matches!(recorder.outcome("a.eult"), Outcome::Fail(reason) if reason.starts_with("cannot start subject")));
}

#[test]
fn test_console_output_for_mixed_run() {
    let dir = corpus(&[("a.eult", "# out:a\necho a\n"), ("b.eult", "# out:x\n")]);
    let config = test_config(dir.path());
    let mut reporter = ConsoleReporter::new(Vec::new(), config.console_banner_width);
    run_tests(&config, Path::new(SH), &mut reporter).unwrap();

    let text = String::from_utf8(reporter.into_inner()).unwrap();
    let root = dir.path().display().to_string();
    let text = text.replace(&root, "<root>");
    insta::assert_snapshot!(text, @r"
    ======== tests =========
    <root>/a.eult -> ok
    <root>/b.eult -> error: want 1 lines, got 0
    ======== result ========
    error [1]
    ");
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_config(root: &Path, results: &Path) -> HarnessConfig {
    HarnessConfig::benchmarks()
        .with_fixture_root(root)
        .with_results_dir(results)
}

#[test]
fn test_benchmark_report_block() {
    let dir = corpus(&[("a/b.eulb", "echo 42\n")]);
    let results = tempdir().unwrap();
    let mut console = Vec::new();

    let summary = run_benchmarks(&bench_config(dir.path(), results.path()), Path::new(SH), &mut console).unwrap();

    assert_eq!(summary.recorded, 1);
    assert_eq!(summary.errors, 0);
    assert!(summary.report.starts_with(results.path()));
    let name = summary.report.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("result_") && name.ends_with(".txt"), "unexpected report name {name}");

    let report = fs::read_to_string(&summary.report).unwrap();
    let mut lines = report.lines();
    let fixture = dir.path().join("a").join("b.eulb").display().to_string();
    assert_eq!(lines.next(), Some(cover(&fixture, 80, '=').as_str()));
    assert_eq!(lines.next(), Some("pytime:"));
    let seconds: f64 = lines.next().unwrap().parse().unwrap();
    assert!(seconds >= 0.0);
    assert_eq!(lines.next(), Some(""));
    assert_eq!(lines.next(), Some("program stdout:"));
    assert_eq!(lines.next(), Some("42"));
    assert!(report.ends_with("program stdout:\n42\n\n"));

    let console = String::from_utf8(console).unwrap();
    assert!(console.ends_with("done!\nall done!\n"));
}

#[test]
fn test_benchmark_skips_fixtures_with_stderr() {
    let dir = corpus(&[
        ("a_ok.eulb", "echo fine\n"),
        ("b_err.eulb", "echo 'runtime error: stack overflow in recursive call chain' >&2\n"),
    ]);
    let results = tempdir().unwrap();
    let mut console = Vec::new();

    let summary = run_benchmarks(&bench_config(dir.path(), results.path()), Path::new(SH), &mut console).unwrap();

    assert_eq!(summary.recorded, 1);
    assert_eq!(summary.errors, 1);
    let report = fs::read_to_string(&summary.report).unwrap();
    assert!(report.contains("program stdout:\nfine\n"));
    assert!(!report.contains("stack overflow"));

    let console = String::from_utf8(console).unwrap();
    let expected = format!(
        "{} -> error at {}: runtime error: stack overflow in\n",
        dir.path().join("b_err.eulb").display(),
        dir.path().join("b_err.eulb").display()
    );
    assert!(console.contains(&expected), "console was:\n{console}");
}

#[test]
fn test_benchmark_runs_do_not_overwrite_each_other() {
    let dir = corpus(&[("x.eulb", "echo 1\n")]);
    let results = tempdir().unwrap();
    let config = bench_config(dir.path(), results.path());

    let first = run_benchmarks(&config, Path::new(SH), &mut Vec::new()).unwrap();
    let second = run_benchmarks(&config, Path::new(SH), &mut Vec::new()).unwrap();

    assert_ne!(first.report, second.report);
    assert!(first.report.exists());
    assert!(second.report.exists());
}

#[test]
fn test_benchmark_missing_root_writes_no_report() {
    let dir = tempdir().unwrap();
    let results = dir.path().join("results");
    let config = bench_config(&dir.path().join("missing"), &results);
    let err = run_benchmarks(&config, Path::new(SH), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, HarnessError::Discovery { .. }));
    assert!(!results.exists());
}
