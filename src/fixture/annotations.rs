//! Expectation annotations
//!
//! Fixtures declare what the subject should print through line comments:
//!
//! ```text
//! print("a")   # out:a
//! print("b")   # out:b
//! oops(        # err:...
//! ```
//!
//! `out:` lines accumulate in file order. Only the first `err:` line counts,
//! and the value `...` accepts any error. Lines that look like markers but
//! do not match the pattern are ignored.

use regex::Regex;

use crate::error::{HarnessError, HarnessResult};
use crate::text::split_lines;

/// Expected-error value that accepts any error output.
pub const WILDCARD_ERROR: &str = "...";

/// What a fixture expects on stderr.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorExpectation {
    /// No `err:` annotation
    #[default]
    None,
    /// `err:...`
    Any,
    /// Exact first line of stderr
    Exact(String),
}

impl ErrorExpectation {
    fn from_value(value: &str) -> Self {
        if value == WILDCARD_ERROR {
            Self::Any
        } else {
            Self::Exact(value.to_string())
        }
    }

    /// The expected text as written in the fixture; empty when absent.
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "",
            Self::Any => WILDCARD_ERROR,
            Self::Exact(text) => text,
        }
    }
}

/// Expectations parsed from one fixture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expectations {
    pub output: Vec<String>,
    pub error: ErrorExpectation,
}

/// Compiled marker patterns for one comment syntax.
#[derive(Debug, Clone)]
pub struct AnnotationParser {
    out_marker: Regex,
    err_marker: Regex,
}

impl AnnotationParser {
    /// Compile the markers for `comment_prefix`, a regex literal such as `#` or `//`.
    pub fn new(comment_prefix: &str) -> HarnessResult<Self> {
        Ok(Self {
            out_marker: marker(comment_prefix, "out")?,
            err_marker: marker(comment_prefix, "err")?,
        })
    }

    /// Extract expectations from fixture text.
    pub fn parse(&self, source: &str) -> Expectations {
        let mut expectations = Expectations::default();
        let mut error_seen = false;

        for line in split_lines(source) {
            if let Some(value) = capture(&self.out_marker, line) {
                expectations.output.push(value.to_string());
                continue;
            }
            if error_seen {
                continue;
            }
            if let Some(value) = capture(&self.err_marker, line) {
                expectations.error = ErrorExpectation::from_value(value);
                error_seen = true;
            }
        }

        expectations
    }
}

fn marker(comment_prefix: &str, kind: &str) -> HarnessResult<Regex> {
    Regex::new(&format!("{comment_prefix} {kind}:(.+)")).map_err(|source| HarnessError::InvalidPattern {
        pattern: comment_prefix.to_string(),
        source,
    })
}

fn capture<'a>(pattern: &Regex, line: &'a str) -> Option<&'a str> {
    pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}
