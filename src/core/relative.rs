//! Output path relative to the build root.
//!
//! The relative form is used as the public asset prefix, so it always uses
//! forward slashes regardless of the host platform.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::util::fs::lexical_normalize;

/// An output directory expressed relative to the build root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeOutputPath {
    path: String,
    stripped: bool,
}

impl RelativeOutputPath {
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Whether the build root prefix was actually removed.
    ///
    /// `false` means the output directory did not start with the build root
    /// and the value is the (slash-normalized) output directory itself.
    pub fn is_stripped(&self) -> bool {
        self.stripped
    }
}

impl AsRef<str> for RelativeOutputPath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RelativeOutputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Strip `build_root` plus one separator from the front of `output_dir`.
///
/// The separator is `\` when `is_windows` is set and `/` otherwise. The
/// comparison is textual. When the prefix does not match, `output_dir` is
/// returned as-is. Backslashes in the result are replaced by `/`.
pub fn compute_relative_output_path(
    build_root: &Path,
    output_dir: &Path,
    is_windows: bool,
) -> RelativeOutputPath {
    let separator = if is_windows { '\\' } else { '/' };
    let mut prefix = build_root.to_string_lossy().into_owned();
    prefix.push(separator);

    let output = output_dir.to_string_lossy();
    let (rest, stripped) = match output.strip_prefix(prefix.as_str()) {
        Some(rest) => (rest, true),
        None => {
            tracing::debug!(
                "{} does not start with {}, leaving it unchanged",
                output,
                prefix
            );
            (&*output, false)
        }
    };

    RelativeOutputPath {
        path: rest.replace('\\', "/"),
        stripped,
    }
}

/// Resolve the sibling output directory `<bundle_dir>/../<codename>`.
pub fn resolve_output_dir(bundle_dir: &Path, codename: &str) -> PathBuf {
    lexical_normalize(&bundle_dir.join("..").join(codename))
}
