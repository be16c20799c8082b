// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module identity (§3 `ModuleRef`) and warning names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique identifier for a recipe module: `{repo}/{name}`.
///
/// A module exists in exactly one repo; references from other repos use the
/// qualified form. Within the declaring repo, the unqualified short name is
/// equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleRef {
    pub repo: String,
    pub name: String,
}

impl ModuleRef {
    pub fn new(repo: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            name: name.into(),
        }
    }

    /// Parse a `DEPS` entry (`"name"` or `"repo/name"`) against the repo the
    /// declaring module/recipe lives in.
    pub fn parse(entry: &str, owning_repo: &str) -> Self {
        match entry.split_once('/') {
            Some((repo, name)) => ModuleRef::new(repo, name),
            None => ModuleRef::new(owning_repo, entry),
        }
    }

    pub fn qualified(&self) -> String {
        format!("{}/{}", self.repo, self.name)
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified())
    }
}

/// Name of a warning attributed to callers that transitively depend on a
/// module declaring it in `WARNINGS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WarningName(pub String);

impl fmt::Display for WarningName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "module_ref_tests.rs"]
mod tests;
