//! `pax path` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::PathArgs;
use pax::core::build_root::find_build_root;
use pax::core::manifest::{Manifest, MANIFEST_NAME};
use pax::core::relative::{compute_relative_output_path, resolve_output_dir};
use pax::util::diagnostic::{emit, suggestions, Diagnostic};
use pax::util::fs::lexical_normalize;
use pax::GlobalContext;

pub fn execute(args: PathArgs, ctx: &GlobalContext) -> Result<()> {
    let bundle_dir = if args.from.is_none() || args.output.is_none() {
        Some(ctx.bundle_dir(args.bundle.as_deref())?)
    } else {
        None
    };

    let start = match (&args.from, &bundle_dir) {
        (Some(from), _) => lexical_normalize(&ctx.cwd().join(from)),
        (None, Some(bundle)) => lexical_normalize(&bundle.join("..")),
        (None, None) => ctx.cwd().to_path_buf(),
    };

    let output = match (&args.output, &bundle_dir) {
        (Some(output), _) => lexical_normalize(&ctx.cwd().join(output)),
        (None, Some(bundle)) => {
            let manifest = Manifest::load(&bundle.join(MANIFEST_NAME))?;
            resolve_output_dir(bundle, manifest.codename())
        }
        (None, None) => PathBuf::from("."),
    };

    let root = find_build_root(&start)?;
    let relative = compute_relative_output_path(root.path(), &output, args.platform.is_windows());

    if !relative.is_stripped() {
        let mut diag = Diagnostic::warning("output directory is not inside the project root");
        if let Some(bundle) = &bundle_dir {
            diag = diag.with_location(bundle.join(MANIFEST_NAME));
        }
        let diag = diag
            .with_context(format!("project root: {}", root))
            .with_context(format!("output: {}", output.display()))
            .with_suggestion(suggestions::OUTPUT_OUTSIDE_ROOT);
        emit(&diag, ctx.color());
    }

    println!("{}", relative);

    Ok(())
}
