// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local path overrides for repo dependencies (§4.5 "Override",
//! §10.5 CLI `-O repo=path`).

use std::collections::HashMap;
use std::path::PathBuf;

/// Rebinds a `repo_name` to an absolute local path, bypassing repo-level
/// pinning. Overrides compose: each `-O` flag adds one entry, later flags
/// for the same repo win.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    paths: HashMap<String, PathBuf>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one `-O name=/local/path` flag value.
    pub fn parse_flag(raw: &str) -> Result<(String, PathBuf), String> {
        let (name, path) = raw
            .split_once('=')
            .ok_or_else(|| format!("invalid override `{raw}`, expected `name=path`"))?;
        if name.is_empty() {
            return Err(format!("invalid override `{raw}`, repo name is empty"));
        }
        Ok((name.to_string(), PathBuf::from(path)))
    }

    pub fn add(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(name.into(), path.into());
    }

    pub fn add_flag(&mut self, raw: &str) -> Result<(), String> {
        let (name, path) = Self::parse_flag(raw)?;
        self.add(name, path);
        Ok(())
    }

    /// The local path override for `repo_name`, if any.
    pub fn resolve(&self, repo_name: &str) -> Option<&PathBuf> {
        self.paths.get(repo_name)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
#[path = "overrides_tests.rs"]
mod tests;
