// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rcp analyze` - report module reachability/statistics for a repo's
//! recipes. Resolves the manifest and the built-in module registry's
//! dependency graph for every recipe, without the deeper static-analysis
//! passes a full implementation would add (out of scope, §1).

use anyhow::Result;
use clap::Args;

use super::manifest_args::{load_manifest, resolve_overrides, ManifestArgs};
use crate::registry;

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

pub async fn handle(mut args: AnalyzeArgs) -> Result<()> {
    resolve_overrides(&mut args.manifest)?;
    let manifest = load_manifest(&args.manifest)?;
    println!("manifest for `{}` resolved", manifest.repo_name);

    let module_registry = registry::module_registry();
    for recipe_name in registry::names() {
        let Some(recipe) = registry::find(recipe_name) else {
            continue;
        };
        let recipe_ref: &dyn rcp_engine::Recipe = &*recipe;
        match rcp_runbook::resolve(&module_registry, &recipe_ref.deps()) {
            Ok(order) => println!("  {recipe_name}: {} reachable module(s)", order.len()),
            Err(e) => println!("  {recipe_name}: unresolvable ({e})"),
        }
    }
    Ok(())
}
