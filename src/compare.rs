//! Pass/fail decisions
//!
//! Which check runs is decided by the captured streams, not by which
//! annotations the fixture declares: any stderr output routes the fixture to
//! [`check_err`], even if it also declared `out:` lines.

use std::fmt;

use crate::fixture::{ErrorExpectation, Expectations};
use crate::runner::ExecutionResult;
use crate::text::split_lines;

/// Result of comparing one execution against its expectations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail(String),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "ok"),
            Outcome::Fail(reason) => write!(f, "error: {reason}"),
        }
    }
}

/// Compare captured stdout line by line against the expected lines.
pub fn check_out(stdout: &str, expected: &[String]) -> Outcome {
    let actual: Vec<&str> = split_lines(stdout).collect();
    if actual.len() != expected.len() {
        return Outcome::Fail(format!("want {} lines, got {}", expected.len(), actual.len()));
    }
    match expected.iter().zip(&actual).find(|(want, got)| want.as_str() != **got) {
        Some((want, got)) => Outcome::Fail(format!("expected '{want}', got '{got}'")),
        None => Outcome::Pass,
    }
}

/// Compare the first line of captured stderr against the expected error.
pub fn check_err(stderr: &str, expected: &ErrorExpectation) -> Outcome {
    if *expected == ErrorExpectation::Any {
        return Outcome::Pass;
    }
    let first = split_lines(stderr).next().unwrap_or("");
    let want = expected.as_str();
    if first == want {
        Outcome::Pass
    } else {
        Outcome::Fail(format!("expected '{want}', got '{first}'"))
    }
}

/// Select and run the check for an execution.
pub fn compare(result: &ExecutionResult, expectations: &Expectations) -> Outcome {
    if result.stderr.is_empty() {
        check_out(&result.stdout, &expectations.output)
    } else {
        check_err(&result.stderr, &expectations.error)
    }
}
