//! Pax.toml manifest parsing and schema.
//!
//! The manifest lives in the bundle directory and names the sibling
//! directory the built theme is written to.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "Pax.toml";

/// Errors related to locating or validating the manifest.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("could not find `Pax.toml` in {} or any parent directory", .dir.display())]
    #[diagnostic(
        code(pax::manifest::not_found),
        help("run pax from the bundle directory, or pass --bundle <dir>")
    )]
    NotFound { dir: PathBuf },

    #[error("invalid codename `{codename}`: {reason}")]
    #[diagnostic(
        code(pax::manifest::codename),
        help("the codename is a single directory name, e.g. `codename = \"theme\"`")
    )]
    InvalidCodename {
        codename: String,
        reason: &'static str,
    },
}

/// The parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub bundle: BundleConfig,
}

/// `[bundle]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Name of the output directory next to the bundle directory
    pub codename: String,

    /// Prepend `@babel/polyfill` to the entry list
    #[serde(default = "default_true")]
    pub polyfill: bool,

    /// Main entry, relative to the bundle directory
    #[serde(default = "default_entry")]
    pub entry: String,

    /// Emitted script name
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Emitted stylesheet name
    #[serde(default = "default_css_filename")]
    pub css_filename: String,

    /// Emitted asset manifest name
    #[serde(default = "default_manifest_filename")]
    pub manifest_filename: String,
}

fn default_true() -> bool {
    true
}

fn default_entry() -> String {
    "core/main.js".to_string()
}

fn default_filename() -> String {
    "custom.js".to_string()
}

fn default_css_filename() -> String {
    "custom.css".to_string()
}

fn default_manifest_filename() -> String {
    "manifest.json".to_string()
}

impl Manifest {
    /// Load and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = crate::util::fs::read_to_string(path)?;
        contents
            .parse()
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Check that the codename names a single directory.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let codename = &self.bundle.codename;
        let reason = if codename.trim().is_empty() {
            Some("must not be empty")
        } else if codename.contains('/') || codename.contains('\\') {
            Some("must not contain path separators")
        } else if codename == "." || codename == ".." {
            Some("must not refer to the current or parent directory")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ManifestError::InvalidCodename {
                codename: codename.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }

    pub fn codename(&self) -> &str {
        &self.bundle.codename
    }
}

impl FromStr for Manifest {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }
}

/// Find `Pax.toml` in `start` or the nearest parent that has one.
pub fn find_manifest(start: &Path) -> Result<PathBuf, ManifestError> {
    find_manifest_named(start, MANIFEST_NAME)
}

fn find_manifest_named(start: &Path, file_name: &str) -> Result<PathBuf, ManifestError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(file_name);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(ManifestError::NotFound {
                dir: start.to_path_buf(),
            });
        }
    }
}
