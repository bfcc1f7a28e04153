//! Error types for harness runs
//!
//! Two families, matching how a run treats them:
//!
//! - [`HarnessError`] is fatal. It stops the run before (or while) fixtures
//!   execute and is rendered as a diagnostic by the CLI.
//! - [`RunError`] belongs to a single fixture. The run loop converts it into a
//!   failed outcome and moves on to the next fixture.

use std::path::PathBuf;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that abort a whole run.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("fixture root '{}' does not exist or is not a directory", root.display())]
    #[diagnostic(
        code(harness::discovery),
        help("pass --root <DIR> or run from the repository root")
    )]
    Discovery { root: PathBuf },

    #[error("failed to launch `{program}` to build the subject")]
    #[diagnostic(code(harness::build::spawn), help("is the toolchain installed and on PATH?"))]
    BuildSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("subject build failed ({status})\n{stderr}")]
    #[diagnostic(code(harness::build))]
    Build { status: String, stderr: String },

    #[error("invalid comment prefix pattern '{pattern}'")]
    #[diagnostic(
        code(harness::config::pattern),
        help("the comment prefix is a regular expression; escape special characters")
    )]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("cannot write benchmark report '{}'", path.display())]
    #[diagnostic(code(harness::report))]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors confined to a single subject invocation.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("cannot start subject: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("cannot wait for subject: {0}")]
    Wait(#[source] std::io::Error),

    #[error("cannot capture subject {stream}: {source}")]
    Capture {
        stream: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub type HarnessResult<T> = Result<T, HarnessError>;
