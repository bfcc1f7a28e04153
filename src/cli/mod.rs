//! CLI module for the eule harness
//!
//! ## Commands
//!
//! - `test` - Build the subject and run the conformance fixtures
//! - `bench` - Build the subject and write a timing report
//!
//! Both commands work without flags; flags only override the defaults in
//! [`HarnessConfig`].
//!
//! ## Modules
//!
//! - `subject` - Subject build and cleanup
//! - `test_runner` - Conformance flow and console reporting
//! - `bench_runner` - Benchmark flow
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod bench_runner;
pub mod subject;
pub mod test_runner;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::version::HARNESS_VERSION;

use self::subject::Subject;
use self::test_runner::ConsoleReporter;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<HarnessError> for CliError {
    fn from(err: HarnessError) -> Self {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Golden-file conformance harness and benchmark runner for the eule interpreter
#[derive(Parser, Debug)]
#[command(name = "eule-harness")]
#[command(version = HARNESS_VERSION)]
#[command(about = "Conformance tests and benchmarks for the eule interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the conformance fixtures and check their annotations
    Test {
        #[command(flatten)]
        common: CommonArgs,
        /// Per-fixture timeout in milliseconds (0 disables it)
        #[arg(long = "timeout-ms", value_name = "MS")]
        timeout_ms: Option<u64>,
    },

    /// Time the benchmark fixtures and write a report
    Bench {
        #[command(flatten)]
        common: CommonArgs,
        /// Directory for report files
        #[arg(long = "results-dir", value_name = "DIR")]
        results_dir: Option<PathBuf>,
    },
}

/// Overrides shared by both commands.
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Fixture root directory
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
    /// Fixture extension, without the dot (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,
    /// Use a prebuilt subject instead of building one
    #[arg(long, value_name = "PATH")]
    pub subject: Option<PathBuf>,
    /// Comment prefix pattern preceding `out:` / `err:`
    #[arg(long = "comment", value_name = "REGEX")]
    pub comment_prefix: Option<String>,
}

impl CommonArgs {
    fn apply(&self, mut config: HarnessConfig) -> HarnessConfig {
        if let Some(root) = &self.root {
            config = config.with_fixture_root(root);
        }
        if !self.extensions.is_empty() {
            config = config.with_extensions(self.extensions.iter().cloned());
        }
        if let Some(prefix) = &self.comment_prefix {
            config = config.with_comment_prefix(prefix.clone());
        }
        config
    }

    fn subject(&self, config: &HarnessConfig) -> CliResult<Subject> {
        match &self.subject {
            Some(path) => Ok(Subject::prebuilt(path)),
            None => Ok(Subject::build(&config.subject)?),
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
///
/// The subject guard lives inside this call, so the built binary is removed
/// before `run()` exits the process.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Test { common, timeout_ms } => {
            let mut config = common.apply(HarnessConfig::tests());
            if let Some(ms) = timeout_ms {
                config = config.with_timeout((ms > 0).then_some(Duration::from_millis(ms)));
            }
            execute_test(&config, &common)
        }
        Command::Bench { common, results_dir } => {
            let mut config = common.apply(HarnessConfig::benchmarks());
            if let Some(dir) = results_dir {
                config = config.with_results_dir(dir);
            }
            execute_bench(&config, &common)
        }
    }
}

fn execute_test(config: &HarnessConfig, common: &CommonArgs) -> CliResult<ExitCode> {
    let subject = common.subject(config)?;
    let mut reporter = ConsoleReporter::stdout(config.console_banner_width);
    let tally = test_runner::run_tests(config, subject.path(), &mut reporter)?;
    tracing::info!(total = tally.total(), failed = tally.failed, "test run finished");

    if tally.has_failures() {
        // Summary already printed
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn execute_bench(config: &HarnessConfig, common: &CommonArgs) -> CliResult<ExitCode> {
    let subject = common.subject(config)?;
    let summary = bench_runner::run_benchmarks(config, subject.path(), &mut io::stdout())?;
    tracing::info!(
        report = %summary.report.display(),
        recorded = summary.recorded,
        errors = summary.errors,
        "benchmark report written"
    );
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Tests
// ============================================================================
