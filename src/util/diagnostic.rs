//! User-friendly diagnostic messages.
//!
//! Warnings and errors printed by the CLI carry context lines and concrete
//! suggestions.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;

use crate::core::build_root::BuildRootError;
use crate::core::manifest::ManifestError;
use crate::ops::plan::PlanError;
use crate::util::config::ConfigError;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when the output directory is outside the build root.
    pub const OUTPUT_OUTSIDE_ROOT: &str =
        "help: Place the codename directory inside the project, next to the bundle";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    fn with_severity(message: impl Into<String>, severity: Severity) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Error)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Warning)
    }

    /// Build an error diagnostic from an error chain, with the `help` of
    /// each pax error in the chain as a suggestion.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let mut diag = Self::error(format!("{:#}", err));

        for cause in err.chain() {
            if let Some(help) = help_for(cause) {
                let suggestion = format!("help: {}", help);
                if !diag.suggestions.contains(&suggestion) {
                    diag.suggestions.push(suggestion);
                }
            }
        }

        diag
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        for suggestion in &self.suggestions {
            output.push_str(&format!("  {}\n", suggestion));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

fn help_for(cause: &(dyn StdError + 'static)) -> Option<String> {
    let diag: &dyn MietteDiagnostic = if let Some(e) = cause.downcast_ref::<ManifestError>() {
        e as &dyn MietteDiagnostic
    } else if let Some(e) = cause.downcast_ref::<BuildRootError>() {
        e as &dyn MietteDiagnostic
    } else if let Some(e) = cause.downcast_ref::<PlanError>() {
        e as &dyn MietteDiagnostic
    } else if let Some(e) = cause.downcast_ref::<ConfigError>() {
        e as &dyn MietteDiagnostic
    } else {
        return None;
    };

    diag.help().map(|help| help.to_string())
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
