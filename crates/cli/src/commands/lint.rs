// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rcp lint` - check a repo's recipes/modules against static rules (naming,
//! declared-but-unused DEPS, and similar). The rule set itself is out of
//! scope for this engine build (§1); this command still resolves the
//! manifest so the surface is complete.

use anyhow::Result;
use clap::Args;

use super::manifest_args::{load_manifest, resolve_overrides, ManifestArgs};

#[derive(Args)]
pub struct LintArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

pub async fn handle(mut args: LintArgs) -> Result<()> {
    resolve_overrides(&mut args.manifest)?;
    let manifest = load_manifest(&args.manifest)?;
    println!(
        "manifest for `{}` resolved; no lint rules are implemented in this engine build",
        manifest.repo_name
    );
    Ok(())
}
