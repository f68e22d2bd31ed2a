//! Configuration for pax.
//!
//! Settings come from three layers, later ones winning:
//! - Global: `~/.pax/config.toml`
//! - Project: `<bundle>/.pax/config.toml`
//! - Environment: `HOST`, `PORT`, `ANALYZER`, `SITE_URL`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3000;

/// Pax configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dev server settings
    pub server: ServerConfig,

    /// Build settings
    pub build: BuildConfig,
}

/// Dev server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host the dev server binds to
    pub host: Option<String>,

    /// Port the dev server listens on
    pub port: Option<u16>,

    /// Public URL of the shop the dev server proxies
    pub site_url: Option<String>,
}

/// Build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Emit a bundle analyzer report in development builds
    pub analyzer: Option<bool>,
}

/// Errors in configuration values.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("invalid PORT `{value}`")]
    #[diagnostic(code(pax::config::port), help("PORT must be a number between 0 and 65535"))]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid SITE_URL `{value}`")]
    #[diagnostic(
        code(pax::config::site_url),
        help("use an absolute URL such as `http://shop.test/admin/`")
    )]
    InvalidSiteUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.server.host.is_some() {
            self.server.host = other.server.host;
        }
        if other.server.port.is_some() {
            self.server.port = other.server.port;
        }
        if other.server.site_url.is_some() {
            self.server.site_url = other.server.site_url;
        }
        if other.build.analyzer.is_some() {
            self.build.analyzer = other.build.analyzer;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (<bundle>/.pax/config.toml)
/// 2. Global config (~/.pax/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global pax config directory (~/.pax).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".pax"))
}

/// Get the global config path (~/.pax/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (<bundle>/.pax/config.toml).
pub fn project_config_path(bundle_dir: &Path) -> PathBuf {
    bundle_dir.join(".pax").join("config.toml")
}

/// Effective dev server and build settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub host: String,
    pub port: u16,
    pub analyzer: bool,
    /// Raw site URL, already checked to parse
    pub site_url: Option<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            analyzer: false,
            site_url: None,
        }
    }
}

impl Environment {
    /// Read the process environment on top of `config`.
    pub fn from_env(config: &Config) -> Result<Self, ConfigError> {
        Self::from_lookup(config, |key| std::env::var(key).ok())
    }

    /// Resolve settings using `lookup` for environment variables.
    pub fn from_lookup<F>(config: &Config, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let host = var("HOST")
            .or_else(|| config.server.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match var("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => config.server.port.unwrap_or(DEFAULT_PORT),
        };

        let analyzer = match var("ANALYZER") {
            Some(value) => is_truthy(&value),
            None => config.build.analyzer.unwrap_or(false),
        };

        let site_url = var("SITE_URL").or_else(|| config.server.site_url.clone());
        if let Some(ref value) = site_url {
            Url::parse(value).map_err(|source| ConfigError::InvalidSiteUrl {
                value: value.clone(),
                source,
            })?;
        }

        Ok(Environment {
            host,
            port,
            analyzer,
            site_url,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
