//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use pax::Mode;

/// Pax - build root detection and public path planning for the admin theme bundle
#[derive(Parser)]
#[command(name = "pax")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the project root (nearest directory containing `app`)
    Root(RootArgs),

    /// Print the output directory relative to the project root
    Path(PathArgs),

    /// Print the build plan as JSON
    Plan(PlanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Separator used when stripping the project root.
#[derive(Args, Default)]
#[group(multiple = false)]
pub struct PlatformArgs {
    /// Strip the root with `\` separators
    #[arg(long)]
    pub windows: bool,

    /// Strip the root with `/` separators
    #[arg(long)]
    pub posix: bool,
}

impl PlatformArgs {
    pub fn is_windows(&self) -> bool {
        if self.windows {
            true
        } else if self.posix {
            false
        } else {
            cfg!(windows)
        }
    }
}

#[derive(Args)]
pub struct RootArgs {
    /// Directory to start searching from (defaults to current directory)
    #[arg(long)]
    pub from: Option<PathBuf>,
}

#[derive(Args)]
pub struct PathArgs {
    /// Bundle directory containing Pax.toml (defaults to the nearest one)
    #[arg(long)]
    pub bundle: Option<PathBuf>,

    /// Output directory (defaults to the manifest codename next to the bundle)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory to start the root search from (defaults to the bundle's parent)
    #[arg(long)]
    pub from: Option<PathBuf>,

    #[command(flatten)]
    pub platform: PlatformArgs,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Build mode
    #[arg(short, long, default_value = "production")]
    pub mode: Mode,

    /// Bundle directory containing Pax.toml (defaults to the nearest one)
    #[arg(long)]
    pub bundle: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub platform: PlatformArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
