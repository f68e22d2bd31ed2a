//! Test utilities for pax unit tests.
//!
//! Provides an on-disk project fixture shaped like a real shop checkout:
//! an `app` marker at the project root and a bundle directory a few levels
//! below it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Bundle directory, relative to the project root.
pub const BUNDLE_PATH: &str = "view/adminhtml/web/js/pax";

/// Fixture for a project with a pax bundle.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Output codename.
    pub codename: String,
    /// Pax.toml content.
    pub manifest: String,
}

impl ProjectFixture {
    /// Create a fixture whose manifest names `codename`.
    pub fn new(codename: impl Into<String>) -> Self {
        let codename = codename.into();
        let manifest = format!("[bundle]\ncodename = \"{}\"\n", codename);
        ProjectFixture {
            codename,
            manifest,
        }
    }

    /// Replace the manifest content.
    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = manifest.into();
        self
    }

    /// Write the fixture into a fresh temporary directory.
    pub fn write(&self) -> io::Result<ProjectDir> {
        let tmp = TempDir::new()?;
        let root = crate::util::fs::absolutize(&tmp.path().join("shop"))?;
        let bundle = root.join(BUNDLE_PATH);

        fs::create_dir_all(bundle.join("core"))?;
        fs::create_dir_all(root.join("app"))?;
        fs::write(bundle.join("Pax.toml"), &self.manifest)?;
        fs::write(bundle.join("core").join("main.js"), "")?;

        Ok(ProjectDir {
            _tmp: tmp,
            root,
            bundle,
            codename: self.codename.clone(),
        })
    }
}

/// A written fixture. The directory is removed on drop.
#[derive(Debug)]
pub struct ProjectDir {
    _tmp: TempDir,
    root: PathBuf,
    bundle: PathBuf,
    codename: String,
}

impl ProjectDir {
    /// Project root (the directory holding `app`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bundle_dir(&self) -> &Path {
        &self.bundle
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.bundle.join("Pax.toml")
    }

    /// Expected output directory next to the bundle.
    pub fn output_dir(&self) -> PathBuf {
        self.bundle
            .parent()
            .map(|p| p.join(&self.codename))
            .unwrap_or_else(|| self.root.join(&self.codename))
    }
}
