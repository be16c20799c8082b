// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository manifest parsing (§6 `infra/config/recipes.cfg`).

use rcp_core::RepoRef;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// The manifest's on-disk format. `recipes.cfg` is read as TOML by
/// default; HCL and JSON are accepted too, the same way runbook files are
/// in this stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Hcl,
    Json,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("HCL parse error: {0}")]
    Hcl(#[from] hcl::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest at {location} is missing a dependency on the engine's own repo with a pinned revision")]
    MissingEngineDep { location: String },
}

/// One entry in the manifest's `deps` list (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepSpec {
    pub name: String,
    pub url: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    pub revision: String,
}

fn default_branch() -> String {
    "main".to_string()
}

/// The repository manifest (§6): `{api_version, repo_name, recipes_path,
/// deps}`. `repo_name` is aliased `project_id` for compatibility with
/// manifests written against either name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoManifest {
    pub api_version: u32,
    #[serde(alias = "project_id")]
    pub repo_name: String,
    #[serde(default)]
    pub recipes_path: PathBuf,
    #[serde(default)]
    pub deps: Vec<DepSpec>,
}

impl RepoManifest {
    /// Parse a manifest, requiring a pinned dependency on `engine_repo_name`
    /// (§6: "every repo must declare a dependency on the engine's own repo
    /// with a pinned revision").
    pub fn parse(content: &str, format: Format, engine_repo_name: &str, location: &str) -> Result<Self, ManifestError> {
        let manifest: RepoManifest = match format {
            Format::Toml => toml::from_str(content)?,
            Format::Hcl => hcl::from_str(content)?,
            Format::Json => serde_json::from_str(content)?,
        };
        let has_pinned_engine_dep = manifest
            .deps
            .iter()
            .any(|d| d.name == engine_repo_name && !d.revision.is_empty());
        if !has_pinned_engine_dep {
            return Err(ManifestError::MissingEngineDep {
                location: location.to_string(),
            });
        }
        Ok(manifest)
    }

    /// Build the [`RepoRef`] this manifest describes for its own repo, given
    /// the pinned revision resolved for it (by its own dependents, or
    /// itself if it is the entry repo).
    pub fn to_repo_ref(&self, url: String, branch: String, pinned_revision: String) -> RepoRef {
        RepoRef {
            name: self.repo_name.clone(),
            url,
            branch,
            pinned_revision,
            recipes_path: self.recipes_path.clone(),
        }
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
