//! Run configuration
//!
//! Everything a run needs is carried in [`HarnessConfig`] and passed into the
//! run loops explicitly. The two presets match the conformance and benchmark
//! corpora of the eule repository.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Width of the console banners printed around a test run.
pub const CONSOLE_BANNER_WIDTH: usize = 24;

/// Width of the per-fixture banner in benchmark reports.
pub const REPORT_BANNER_WIDTH: usize = 80;

/// How to produce the subject binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectConfig {
    /// Directory the build command runs in
    pub build_dir: PathBuf,
    /// Toolchain executable
    pub program: String,
    /// Arguments; `{binary}` is replaced with `binary_name`
    pub args: Vec<String>,
    /// File name of the built binary inside `build_dir`
    pub binary_name: String,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("goeule"),
            program: "go".to_string(),
            args: ["build", "-o", "{binary}", "."].map(String::from).to_vec(),
            binary_name: "__test_build.exe".to_string(),
        }
    }
}

impl SubjectConfig {
    /// Path of the built binary, relative to the working directory.
    pub fn binary_path(&self) -> PathBuf {
        self.build_dir.join(&self.binary_name)
    }

    /// Build arguments with the binary placeholder substituted.
    pub fn resolved_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace("{binary}", &self.binary_name))
            .collect()
    }
}

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory searched recursively for fixtures
    pub fixture_root: PathBuf,
    /// Fixture extensions, without the leading dot
    pub extensions: Vec<String>,
    /// Wall-clock bound per subject invocation
    pub timeout: Option<Duration>,
    /// Regex literal for the line-comment token preceding `out:` / `err:`
    pub comment_prefix: String,
    /// Where benchmark reports are written
    pub results_dir: PathBuf,
    /// Report file name prefix
    pub report_prefix: String,
    pub console_banner_width: usize,
    pub report_banner_width: usize,
    pub subject: SubjectConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::tests()
    }
}

impl HarnessConfig {
    /// Conformance preset: `*.eult` under `tests`, 2s timeout.
    pub fn tests() -> Self {
        Self {
            fixture_root: PathBuf::from("tests"),
            extensions: vec!["eult".to_string()],
            timeout: Some(Duration::from_secs(2)),
            comment_prefix: "#".to_string(),
            results_dir: PathBuf::from("benchmarks_results"),
            report_prefix: "result".to_string(),
            console_banner_width: CONSOLE_BANNER_WIDTH,
            report_banner_width: REPORT_BANNER_WIDTH,
            subject: SubjectConfig::default(),
        }
    }

    /// Benchmark preset: `*.eulb` under `tests`, no timeout.
    pub fn benchmarks() -> Self {
        Self {
            extensions: vec!["eulb".to_string()],
            timeout: None,
            ..Self::tests()
        }
    }

    /// Set the fixture root
    pub fn with_fixture_root(mut self, root: impl AsRef<Path>) -> Self {
        self.fixture_root = root.as_ref().to_path_buf();
        self
    }

    /// Replace the extension set
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set or clear the per-fixture timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the comment prefix pattern
    pub fn with_comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// Set the benchmark results directory
    pub fn with_results_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.results_dir = dir.as_ref().to_path_buf();
        self
    }
}
