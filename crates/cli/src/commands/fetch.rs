// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rcp fetch` - resolve a repo's manifest and its dependency closure
//! without checking anything out. Git fetch itself is out of scope (§1
//! Non-goals: distributed execution); this command validates the same
//! manifest/`-O` override inputs the rest of the CLI surface accepts so a
//! caller gets a clear, typed error rather than a missing subcommand.

use anyhow::Result;
use clap::Args;

use super::manifest_args::{load_manifest, resolve_overrides, ManifestArgs};

#[derive(Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

pub async fn handle(mut args: FetchArgs) -> Result<()> {
    resolve_overrides(&mut args.manifest)?;
    let manifest = load_manifest(&args.manifest)?;
    println!(
        "resolved manifest for `{}` ({} declared dep(s))",
        manifest.repo_name,
        manifest.deps.len()
    );
    for dep in &manifest.deps {
        match args.manifest.override_paths.resolve(&dep.name) {
            Some(path) => println!("  {} -> local override {}", dep.name, path.display()),
            None => println!("  {} @ {} (not fetched: git fetch is out of scope)", dep.name, dep.revision),
        }
    }
    Ok(())
}
