//! Subject binary lifecycle
//!
//! The subject is built once per run with the external toolchain and removed
//! again when the [`Subject`] is dropped, on success, error or panic alike.
//! A prebuilt subject passed on the command line is used as is and never
//! deleted.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::SubjectConfig;
use crate::error::{HarnessError, HarnessResult};

/// The binary under test, owned for the duration of a run.
#[derive(Debug)]
pub struct Subject {
    path: PathBuf,
    /// Whether this run produced the binary and must delete it
    owned: bool,
}

impl Subject {
    /// Build the subject with the configured toolchain.
    pub fn build(config: &SubjectConfig) -> HarnessResult<Self> {
        let args = config.resolved_args();
        tracing::info!(
            program = %config.program,
            ?args,
            dir = %config.build_dir.display(),
            "building subject"
        );

        let output = Command::new(&config.program)
            .args(&args)
            .current_dir(&config.build_dir)
            .output()
            .map_err(|source| HarnessError::BuildSpawn {
                program: config.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(HarnessError::Build {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        let path = config.binary_path();
        if !path.is_file() {
            return Err(HarnessError::Build {
                status: output.status.to_string(),
                stderr: format!("expected binary at '{}' was not produced", path.display()),
            });
        }

        tracing::info!(path = %path.display(), "subject built");
        Ok(Self { path, owned: true })
    }

    /// Use an existing binary; it is left in place after the run.
    pub fn prebuilt(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owned: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Subject {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed subject binary"),
            Err(e) => tracing::warn!("failed to remove subject binary {}: {e}", self.path.display()),
        }
    }
}
