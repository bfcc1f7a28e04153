//! Fixture discovery and loading
//!
//! A fixture is an annotated eule source file. Discovery walks a root
//! directory lazily and yields every file whose extension is in the
//! configured set; reading and annotation parsing happen per fixture.

mod annotations;

pub use annotations::{AnnotationParser, ErrorExpectation, Expectations, WILDCARD_ERROR};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{HarnessError, HarnessResult};

/// An annotated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub path: PathBuf,
    pub source: String,
}

impl Fixture {
    /// Read a fixture from disk.
    pub fn load(path: &Path) -> io::Result<Self> {
        let source = fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Lazily enumerate fixtures under `root` matching any of `extensions`.
///
/// Entries are walked in file-name order so the sequence is stable for a
/// given tree. Symlinks are followed; a link cycle is reported by the walker
/// and skipped like any other unreadable entry. Fails up front if `root` is
/// not a directory.
pub fn discover_fixtures(
    root: &Path,
    extensions: &[String],
) -> HarnessResult<impl Iterator<Item = PathBuf> + use<>> {
    if !root.is_dir() {
        return Err(HarnessError::Discovery {
            root: root.to_path_buf(),
        });
    }

    let extensions = extensions.to_vec();
    tracing::debug!(root = %root.display(), ?extensions, "discovering fixtures");

    let walker = WalkDir::new(root).follow_links(true).sort_by_file_name().into_iter();
    Ok(walker.filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                return None;
            }
        };
        if !entry.file_type().is_file() || !has_extension(entry.path(), &extensions) {
            return None;
        }
        Some(entry.into_path())
    }))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .is_some_and(|ext| extensions.iter().any(|wanted| ext == wanted.as_str()))
}
