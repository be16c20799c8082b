// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rcp autoroll` - automatically bump every dependency in the manifest to
//! its latest revision. Discovering "latest" requires talking to the
//! upstream repos, which is out of scope for this engine build (§1: repo
//! fetching is an external collaborator); this command still resolves the
//! manifest and reports what it would roll, so the surface §6 describes is
//! complete and well-typed.

use anyhow::Result;
use clap::Args;

use super::manifest_args::{load_manifest, resolve_overrides, ManifestArgs};

#[derive(Args)]
pub struct AutorollArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

pub async fn handle(mut args: AutorollArgs) -> Result<()> {
    resolve_overrides(&mut args.manifest)?;
    let manifest = load_manifest(&args.manifest)?;
    if manifest.deps.is_empty() {
        println!("`{}` declares no dependencies to roll", manifest.repo_name);
        return Ok(());
    }
    println!(
        "`{}` declares {} dependenc(ies); not rolling any (autorolling is out of scope for this engine build)",
        manifest.repo_name,
        manifest.deps.len()
    );
    for dep in &manifest.deps {
        match args.manifest.override_paths.resolve(&dep.name) {
            Some(path) => println!("  {} -> local override {} (not rolled)", dep.name, path.display()),
            None => println!("  {} @ {} (pinned; not rolled)", dep.name, dep.revision),
        }
    }
    Ok(())
}
