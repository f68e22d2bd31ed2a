//! Build plan derivation.
//!
//! Turns a bundle directory, its manifest and the environment into the
//! paths and dev server settings the bundler wrapper consumes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::core::build_root::{find_build_root_with_marker, BuildRoot, MARKER};
use crate::core::manifest::Manifest;
use crate::core::relative::{compute_relative_output_path, resolve_output_dir};
use crate::util::config::Environment;
use crate::util::fs::{absolutize, lexical_normalize};

const POLYFILL_ENTRY: &str = "@babel/polyfill";
const ANALYZER_REPORT: &str = "stat/index.html";
const VUE_RUNTIME: &str = "vue/dist/vue.esm.js";

/// Build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    #[default]
    Production,
}

impl Mode {
    pub fn is_dev(&self) -> bool {
        matches!(self, Mode::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            _ => Err(format!(
                "invalid mode '{}'; expected 'development' or 'production'",
                s
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors specific to plan derivation.
#[derive(Debug, Error, Diagnostic)]
pub enum PlanError {
    #[error("development builds need SITE_URL to configure the dev server proxy")]
    #[diagnostic(
        code(pax::plan::site_url),
        help("set SITE_URL to the shop URL the dev server proxies")
    )]
    MissingSiteUrl,
}

/// Options for [`plan`].
#[derive(Debug, Clone, Copy)]
pub struct PlanOptions {
    pub mode: Mode,
    /// Strip the build root with `\` instead of `/`
    pub is_windows: bool,
    /// Entry name identifying the build root
    pub marker: &'static str,
}

impl Default for PlanOptions {
    fn default() -> Self {
        PlanOptions {
            mode: Mode::default(),
            is_windows: cfg!(windows),
            marker: MARKER,
        }
    }
}

/// Where and how the bundle is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPlan {
    pub path: PathBuf,
    pub filename: String,
    pub public_path: String,
}

/// Dev server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevServerPlan {
    pub host: String,
    pub port: u16,
    pub proxy_url: String,
    /// Prefixes stripped from proxied requests, mapped to their replacement
    pub rewrites: BTreeMap<String, String>,
    pub content_base: PathBuf,
    pub hot_only: bool,
    pub history_api_fallback: bool,
}

/// The full build plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub mode: Mode,
    pub build_root: BuildRoot,
    pub entries: Vec<String>,
    pub output: OutputPlan,
    /// Output directory relative to the build root, `/`-separated
    pub public_relative_path: String,
    /// Public prefix for images and fonts referenced from stylesheets
    pub asset_public_path: String,
    pub css_filename: String,
    pub manifest_filename: String,
    pub aliases: BTreeMap<String, String>,
    pub watch: bool,
    /// Analyzer report file, relative to the output directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer_report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServerPlan>,
    /// Directory the output cleaner is rooted at
    pub clean_root: PathBuf,
}

impl BuildPlan {
    /// Serialize the plan as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.context("failed to serialize build plan")
    }
}

/// Derive the build plan for the bundle in `bundle_dir`.
pub fn plan(
    bundle_dir: &Path,
    manifest: &Manifest,
    env: &Environment,
    opts: &PlanOptions,
) -> Result<BuildPlan> {
    let bundle_dir = absolutize(bundle_dir)
        .with_context(|| format!("failed to resolve bundle directory {}", bundle_dir.display()))?;
    let parent_dir = lexical_normalize(&bundle_dir.join(".."));

    let build_root = find_build_root_with_marker(&parent_dir, opts.marker)?;
    let output_dir = resolve_output_dir(&bundle_dir, manifest.codename());
    let relative =
        compute_relative_output_path(build_root.path(), &output_dir, opts.is_windows);

    tracing::debug!(
        "build root {}, output {} ({})",
        build_root,
        output_dir.display(),
        relative
    );

    let public_path = if opts.mode.is_dev() {
        "/".to_string()
    } else {
        format!("/{}", relative)
    };

    let mut entries = Vec::new();
    if manifest.bundle.polyfill {
        entries.push(POLYFILL_ENTRY.to_string());
    }
    entries.push(path_string(&lexical_normalize(
        &bundle_dir.join(&manifest.bundle.entry),
    )));

    let mut aliases = BTreeMap::new();
    aliases.insert("~".to_string(), path_string(&bundle_dir));
    aliases.insert("assets".to_string(), path_string(&bundle_dir.join("assets")));
    aliases.insert("vue$".to_string(), VUE_RUNTIME.to_string());

    let analyzer_report =
        (opts.mode.is_dev() && env.analyzer).then(|| ANALYZER_REPORT.to_string());

    let dev_server = match (&env.site_url, opts.mode) {
        (Some(site_url), _) => Some(dev_server(site_url, env, &output_dir)?),
        (None, Mode::Development) => return Err(PlanError::MissingSiteUrl.into()),
        (None, Mode::Production) => None,
    };

    Ok(BuildPlan {
        mode: opts.mode,
        build_root,
        entries,
        output: OutputPlan {
            path: output_dir,
            filename: manifest.bundle.filename.clone(),
            public_path,
        },
        public_relative_path: relative.to_string(),
        asset_public_path: format!("../{}", relative),
        css_filename: manifest.bundle.css_filename.clone(),
        manifest_filename: manifest.bundle.manifest_filename.clone(),
        aliases,
        watch: opts.mode.is_dev(),
        analyzer_report,
        dev_server,
        clean_root: parent_dir,
    })
}

fn dev_server(site_url: &str, env: &Environment, output_dir: &Path) -> Result<DevServerPlan> {
    let url = Url::parse(site_url).with_context(|| format!("invalid site URL `{}`", site_url))?;

    let mut site_path = url.path().to_string();
    if let Some(query) = url.query() {
        site_path.push('?');
        site_path.push_str(query);
    }

    let proxy_url = format!("http://{}:{}{}", env.host, env.port, site_path);

    let mut rewrites = BTreeMap::new();
    rewrites.insert(site_url.to_string(), String::new());
    rewrites.insert(format!("^{}", site_path), String::new());

    Ok(DevServerPlan {
        host: env.host.clone(),
        port: env.port,
        proxy_url,
        rewrites,
        content_base: output_dir.join("index.html"),
        hot_only: true,
        history_api_fallback: true,
    })
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::build_root::BuildRootError;
    use crate::test_support::ProjectFixture;

    fn env_with_site(site_url: &str) -> Environment {
        Environment {
            site_url: Some(site_url.to_string()),
            ..Environment::default()
        }
    }

    fn posix(mode: Mode) -> PlanOptions {
        PlanOptions {
            mode,
            is_windows: false,
            ..PlanOptions::default()
        }
    }

    #[test]
    fn test_production_plan() {
        let fixture = ProjectFixture::new("theme").write().unwrap();
        let manifest = Manifest::load(&fixture.manifest_path()).unwrap();

        let plan = plan(
            fixture.bundle_dir(),
            &manifest,
            &Environment::default(),
            &posix(Mode::Production),
        )
        .unwrap();

        assert_eq!(plan.build_root.path(), fixture.root());
        assert_eq!(plan.output.path, fixture.output_dir());
        assert_eq!(plan.public_relative_path, "view/adminhtml/web/js/theme");
        assert_eq!(plan.output.public_path, "/view/adminhtml/web/js/theme");
        assert_eq!(plan.asset_public_path, "../view/adminhtml/web/js/theme");
        assert_eq!(plan.output.filename, "custom.js");
        assert!(!plan.watch);
        assert!(plan.dev_server.is_none());
        assert!(plan.analyzer_report.is_none());
        assert_eq!(plan.entries[0], "@babel/polyfill");
        assert!(plan.entries[1].ends_with("main.js"));
    }

    #[test]
    fn test_development_plan() {
        let fixture = ProjectFixture::new("theme").write().unwrap();
        let manifest = Manifest::load(&fixture.manifest_path()).unwrap();
        let env = Environment {
            analyzer: true,
            ..env_with_site("http://shop.test/admin/?store=1")
        };

        let plan = plan(fixture.bundle_dir(), &manifest, &env, &posix(Mode::Development))
            .unwrap();

        assert_eq!(plan.output.public_path, "/");
        assert_eq!(plan.asset_public_path, "../view/adminhtml/web/js/theme");
        assert!(plan.watch);
        assert_eq!(plan.analyzer_report.as_deref(), Some("stat/index.html"));

        let server = plan.dev_server.unwrap();
        assert_eq!(server.proxy_url, "http://localhost:3000/admin/?store=1");
        assert_eq!(
            server.rewrites.get("http://shop.test/admin/?store=1"),
            Some(&String::new())
        );
        assert!(server.rewrites.contains_key("^/admin/?store=1"));
        assert_eq!(server.content_base, fixture.output_dir().join("index.html"));
    }

    #[test]
    fn test_development_requires_site_url() {
        let fixture = ProjectFixture::new("theme").write().unwrap();
        let manifest = Manifest::load(&fixture.manifest_path()).unwrap();

        let err = plan(
            fixture.bundle_dir(),
            &manifest,
            &Environment::default(),
            &posix(Mode::Development),
        )
        .unwrap_err();
        assert!(err.downcast_ref::<PlanError>().is_some());
    }

    #[test]
    fn test_polyfill_disabled() {
        let fixture = ProjectFixture::new("theme")
            .with_manifest("[bundle]\ncodename = \"theme\"\npolyfill = false\n")
            .write()
            .unwrap();
        let manifest = Manifest::load(&fixture.manifest_path()).unwrap();

        let plan = plan(
            fixture.bundle_dir(),
            &manifest,
            &Environment::default(),
            &posix(Mode::Production),
        )
        .unwrap();
        assert_eq!(plan.entries.len(), 1);
    }

    #[test]
    fn test_missing_marker_fails() {
        let fixture = ProjectFixture::new("theme").write().unwrap();
        let manifest = Manifest::load(&fixture.manifest_path()).unwrap();
        let opts = PlanOptions {
            marker: "pax-test-marker-that-does-not-exist",
            ..posix(Mode::Production)
        };

        let err = plan(fixture.bundle_dir(), &manifest, &Environment::default(), &opts)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildRootError>(),
            Some(BuildRootError::NotFound { .. })
        ));
    }

    #[test]
    fn test_plan_json() {
        let fixture = ProjectFixture::new("theme").write().unwrap();
        let manifest = Manifest::load(&fixture.manifest_path()).unwrap();
        let plan = plan(
            fixture.bundle_dir(),
            &manifest,
            &env_with_site("http://shop.test/"),
            &posix(Mode::Production),
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&plan.to_json(false).unwrap()).unwrap();
        assert_eq!(json["mode"], "production");
        assert_eq!(json["output"]["public_path"], "/view/adminhtml/web/js/theme");
        assert_eq!(json["dev_server"]["proxy_url"], "http://localhost:3000/");
        assert_eq!(json["aliases"]["vue$"], "vue/dist/vue.esm.js");
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("development".parse::<Mode>(), Ok(Mode::Development));
        assert_eq!("PROD".parse::<Mode>(), Ok(Mode::Production));
        assert!("staging".parse::<Mode>().is_err());
    }
}
