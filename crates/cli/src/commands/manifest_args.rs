// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared `infra/config/recipes.cfg` + `-O` override plumbing for the
//! repo-layout commands (`fetch`, `bundle`, `doc`, `lint`, `analyze`,
//! `manual_roll`, `autoroll`, §6). These commands all resolve the same
//! manifest before doing (or, here, declining to do) their own work.

use anyhow::{Context as _, Result};
use clap::Args;
use rcp_runbook::{Format, Overrides, RepoManifest};
use std::path::PathBuf;

/// The name this engine build's own repo is pinned under in every other
/// repo's manifest (§6: "every repo must declare a dependency on the
/// engine's own repo with a pinned revision").
pub const ENGINE_REPO_NAME: &str = "rcp-engine";

#[derive(Args)]
pub struct ManifestArgs {
    /// Path to the repo manifest (`infra/config/recipes.cfg` by default).
    #[arg(long = "manifest", default_value = "infra/config/recipes.cfg")]
    pub manifest_path: PathBuf,

    /// Local path override for a repo dependency, `name=path` (repeatable).
    #[arg(short = 'O', long = "override")]
    pub overrides: Vec<String>,

    #[arg(skip)]
    pub override_paths: Overrides,
}

pub fn load_manifest(args: &ManifestArgs) -> Result<RepoManifest> {
    let content = std::fs::read_to_string(&args.manifest_path)
        .with_context(|| format!("reading manifest at {}", args.manifest_path.display()))?;
    let format = match args.manifest_path.extension().and_then(|e| e.to_str()) {
        Some("json") => Format::Json,
        Some("hcl") => Format::Hcl,
        _ => Format::Toml,
    };
    RepoManifest::parse(&content, format, ENGINE_REPO_NAME, &args.manifest_path.display().to_string())
        .with_context(|| format!("parsing manifest at {}", args.manifest_path.display()))
}

/// Parse `-O` flags into the resolved override set. Called once by each
/// command's `handle` before `load_manifest` is used, since `clap::Args`
/// can't run fallible parsing itself.
pub fn resolve_overrides(args: &mut ManifestArgs) -> Result<()> {
    for raw in &args.overrides {
        args.override_paths
            .add_flag(raw)
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    Ok(())
}
