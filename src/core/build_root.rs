//! Build root detection.
//!
//! The build root is the nearest ancestor of a start directory that
//! contains a marker entry (`app` by default). The walk is bounded by the
//! filesystem root.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::util::fs::{absolutize, has_entry};

/// Entry name that identifies the project root.
pub const MARKER: &str = "app";

/// Errors raised while locating the build root.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildRootError {
    #[error("no `{marker}` entry found in {} or any parent directory", .start.display())]
    #[diagnostic(
        code(pax::root::not_found),
        help("run pax from inside the project, or pass --from <dir>")
    )]
    NotFound { start: PathBuf, marker: String },

    #[error("failed to resolve start directory {}", .path.display())]
    #[diagnostic(code(pax::root::start_dir))]
    StartDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The detected top-level project directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BuildRoot(PathBuf);

impl BuildRoot {
    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for BuildRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for BuildRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Find the build root by walking upward from `start` looking for [`MARKER`].
pub fn find_build_root(start: &Path) -> Result<BuildRoot, BuildRootError> {
    find_build_root_with_marker(start, MARKER)
}

/// Find the nearest ancestor of `start` (inclusive) containing `marker`.
pub fn find_build_root_with_marker(
    start: &Path,
    marker: &str,
) -> Result<BuildRoot, BuildRootError> {
    let start = absolutize(start).map_err(|source| BuildRootError::StartDir {
        path: start.to_path_buf(),
        source,
    })?;

    let mut current = start.clone();
    loop {
        tracing::debug!("looking for `{}` in {}", marker, current.display());
        if has_entry(&current, marker) {
            return Ok(BuildRoot(current));
        }
        if !current.pop() {
            return Err(BuildRootError::NotFound {
                start,
                marker: marker.to_string(),
            });
        }
    }
}
