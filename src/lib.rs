#![forbid(unsafe_code)]
//! eule conformance harness
//!
//! Runs an external interpreter (the *subject*) over a corpus of annotated
//! fixtures. The test flow checks each fixture's stdout or stderr against the
//! `out:` / `err:` comments it carries; the benchmark flow times each run and
//! writes a plain-text report.
//!
//! The pipeline is discovery → annotation parsing → subject execution →
//! comparison → reporting, one fixture at a time.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod fixture;
pub mod report;
pub mod runner;
pub mod text;
pub mod version;

pub use compare::{Outcome, check_err, check_out, compare};
pub use config::{HarnessConfig, SubjectConfig};
pub use error::{HarnessError, HarnessResult, RunError};
pub use fixture::{AnnotationParser, ErrorExpectation, Expectations, Fixture, discover_fixtures};
pub use report::{BenchmarkRecord, ReportWriter, cover, truncate};
pub use runner::{ExecutionResult, run_subject};
pub use text::split_lines;
