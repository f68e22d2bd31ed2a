//! `pax root` command

use anyhow::Result;

use crate::cli::RootArgs;
use pax::core::build_root::find_build_root;
use pax::GlobalContext;

pub fn execute(args: RootArgs, ctx: &GlobalContext) -> Result<()> {
    let start = match args.from {
        Some(dir) => ctx.cwd().join(dir),
        None => ctx.cwd().to_path_buf(),
    };

    let root = find_build_root(&start)?;
    println!("{}", root);

    Ok(())
}
