//! Pax CLI - build root detection and public path planning

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pax::util::diagnostic::{emit, Diagnostic};
use pax::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        emit(&Diagnostic::from_error(&e), color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("pax=debug")
    } else {
        EnvFilter::new("pax=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_color(!cli.no_color);

    match cli.command {
        Commands::Root(args) => commands::root::execute(args, &ctx),
        Commands::Path(args) => commands::path::execute(args, &ctx),
        Commands::Plan(args) => commands::plan::execute(args, &ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
