// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rcp manual-roll` - pin a dependency in the manifest to a specific
//! revision by hand. Editing the manifest back to disk is out of scope for
//! this engine build (§1); this command validates the target revision
//! against the currently-resolved manifest.

use anyhow::{bail, Result};
use clap::Args;

use super::manifest_args::{load_manifest, resolve_overrides, ManifestArgs};

#[derive(Args)]
pub struct ManualRollArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Dependency repo name to roll.
    pub dep_name: String,

    /// Revision to pin it to.
    pub revision: String,
}

pub async fn handle(mut args: ManualRollArgs) -> Result<()> {
    resolve_overrides(&mut args.manifest)?;
    let manifest = load_manifest(&args.manifest)?;
    if !manifest.deps.iter().any(|d| d.name == args.dep_name) {
        bail!("`{}` declares no dependency named `{}`", manifest.repo_name, args.dep_name);
    }
    println!(
        "would pin `{}` to `{}` in `{}` (manifest rewriting is out of scope for this engine build)",
        args.dep_name, args.revision, manifest.repo_name
    );
    Ok(())
}
