//! `pax plan` command

use anyhow::Result;

use crate::cli::PlanArgs;
use pax::core::manifest::{Manifest, MANIFEST_NAME};
use pax::ops::plan::{plan, PlanOptions};
use pax::util::config::Environment;
use pax::GlobalContext;

pub fn execute(args: PlanArgs, ctx: &GlobalContext) -> Result<()> {
    let bundle_dir = ctx.bundle_dir(args.bundle.as_deref())?;
    let manifest = Manifest::load(&bundle_dir.join(MANIFEST_NAME))?;

    // Environment variables override the config files
    let config = ctx.config(&bundle_dir);
    let env = Environment::from_env(&config)?;

    let opts = PlanOptions {
        mode: args.mode,
        is_windows: args.platform.is_windows(),
        ..PlanOptions::default()
    };

    let plan = plan(&bundle_dir, &manifest, &env, &opts)?;
    tracing::debug!("planned {} build into {}", plan.mode, plan.output.path.display());

    println!("{}", plan.to_json(args.pretty)?);

    Ok(())
}
