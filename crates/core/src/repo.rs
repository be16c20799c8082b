// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository references (§3 `RepoRef`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identifies one source of recipe modules, pinned to a single revision for
/// the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub name: String,
    pub url: String,
    pub branch: String,
    pub pinned_revision: String,
    /// In-repo location of `recipes/` and `recipe_modules/`; defaults to the
    /// repo root (`""`).
    #[serde(default)]
    pub recipes_path: PathBuf,
}

impl RepoRef {
    pub fn recipes_dir(&self) -> PathBuf {
        self.recipes_path.join("recipes")
    }

    pub fn recipe_modules_dir(&self) -> PathBuf {
        self.recipes_path.join("recipe_modules")
    }
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
