// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rcp bundle` - package a repo's resolved recipes/modules closure for
//! distribution. Zipping a bundle is out of scope (§1); this command still
//! resolves the manifest so the command surface §6 describes is complete
//! and well-typed.

use anyhow::Result;
use clap::Args;

use super::manifest_args::{load_manifest, resolve_overrides, ManifestArgs};

#[derive(Args)]
pub struct BundleArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Output path for the bundle archive.
    #[arg(long, default_value = "bundle.zip")]
    pub output: std::path::PathBuf,
}

pub async fn handle(mut args: BundleArgs) -> Result<()> {
    resolve_overrides(&mut args.manifest)?;
    let manifest = load_manifest(&args.manifest)?;
    println!(
        "manifest for `{}` resolved; not writing {} (bundling is out of scope for this engine build)",
        manifest.repo_name,
        args.output.display()
    );
    Ok(())
}
