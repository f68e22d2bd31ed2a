//! Global context for pax operations.
//!
//! Provides centralized access to the working directory, the bundle being
//! built and the layered configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{find_manifest, ManifestError};
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global config file (~/.pax/config.toml), if a home directory exists
    global_config: Option<PathBuf>,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            global_config: global_config_path(),
            color: true,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a different global config file (or none).
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Find `Pax.toml` starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        find_manifest(&self.cwd)
    }

    /// Resolve the bundle directory: an explicit override, else the
    /// directory holding the nearest manifest.
    pub fn bundle_dir(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        let dir = match explicit {
            Some(dir) => self.cwd.join(dir),
            None => {
                let manifest = self.find_manifest()?;
                manifest
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.cwd.clone())
            }
        };
        Ok(crate::util::fs::lexical_normalize(&dir))
    }

    /// Load the global config merged with the bundle's project config.
    pub fn config(&self, bundle_dir: &Path) -> Config {
        load_config(
            self.global_config.as_deref(),
            &project_config_path(bundle_dir),
        )
    }
}
