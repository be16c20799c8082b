// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rcp doc` - regenerate a recipe's README from its `DEPS` (§4.9, §6,
//! §10.5). Built-in recipes have no on-disk manifest to walk, so this
//! writes straight from the registry rather than resolving a repo.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::registry;

#[derive(Args)]
pub struct DocArgs {
    /// Recipe to document.
    pub recipe: String,

    /// Directory the README is written under.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

pub async fn handle(args: DocArgs) -> Result<()> {
    let recipe = registry::find(&args.recipe)
        .ok_or_else(|| anyhow::anyhow!("unknown recipe `{}`", args.recipe))?;
    let recipe_ref: &dyn rcp_engine::Recipe = &*recipe;
    let deps: Vec<rcp_core::ModuleRef> = recipe_ref.deps().into_iter().map(|d| d.module).collect();

    let body = rcp_sim::readme::render(&args.recipe, &deps);
    let path = args.out_dir.join(format!("{}.README.md", args.recipe));
    rcp_sim::readme::write_readme(&path, &body)?;
    println!("wrote {}", path.display());
    Ok(())
}
