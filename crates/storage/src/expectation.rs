// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Golden expectation-file persistence (§4.9, §6 `test train`).
//!
//! An expectation file records the JSON-serialized [`BuildPresentation`] a
//! recipe is expected to produce. `test run` loads it and diffs against a
//! freshly simulated run; `test train` overwrites it with the freshly
//! observed presentation. Writes are atomic (temp file, then rename) so a
//! crash mid-train can never leave a corrupt golden file behind.

use crate::presentation::BuildPresentation;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExpectationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recorded expectation: the presentation tree a recipe's simulation
/// test is expected to produce.
pub struct Expectation {
    pub presentation: BuildPresentation,
}

impl Expectation {
    pub fn new(presentation: BuildPresentation) -> Self {
        Self { presentation }
    }

    /// Save the expectation atomically (write to `.tmp`, then rename), the
    /// way materialized state is snapshotted elsewhere in this codebase.
    pub fn save(&self, path: &Path) -> Result<(), ExpectationError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &self.presentation)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load an expectation if the file exists. Returns `Ok(None)` if it is
    /// missing, so a not-yet-trained recipe test can be distinguished from a
    /// genuine mismatch.
    pub fn load(path: &Path) -> Result<Option<Self>, ExpectationError> {
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let presentation = serde_json::from_reader(reader)?;
        Ok(Some(Self { presentation }))
    }

    /// Diff this expectation's observed presentation against a freshly run
    /// one, returning a human-readable line diff when they disagree (§4.9).
    pub fn diff(&self, actual: &BuildPresentation) -> Option<String> {
        let expected_json = serde_json::to_string_pretty(&self.presentation).ok()?;
        let actual_json = serde_json::to_string_pretty(actual).ok()?;
        if expected_json == actual_json {
            return None;
        }
        Some(line_diff(&expected_json, &actual_json))
    }
}

/// The on-disk path for a recipe's expectation file, following the
/// `<recipe>.expected.json` convention (§6).
pub fn expectation_path(recipes_dir: &Path, recipe_name: &str) -> PathBuf {
    recipes_dir
        .join(format!("{recipe_name}.expected"))
        .with_extension("json")
}

/// A minimal unified-style line diff: lines present only on one side are
/// prefixed `-`/`+`, shared lines are left unmarked.
fn line_diff(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    let mut out = String::new();
    let max = expected_lines.len().max(actual_lines.len());
    for i in 0..max {
        match (expected_lines.get(i), actual_lines.get(i)) {
            (Some(e), Some(a)) if e == a => {
                out.push_str("  ");
                out.push_str(e);
                out.push('\n');
            }
            (Some(e), Some(a)) => {
                out.push_str("- ");
                out.push_str(e);
                out.push('\n');
                out.push_str("+ ");
                out.push_str(a);
                out.push('\n');
            }
            (Some(e), None) => {
                out.push_str("- ");
                out.push_str(e);
                out.push('\n');
            }
            (None, Some(a)) => {
                out.push_str("+ ");
                out.push_str(a);
                out.push('\n');
            }
            (None, None) => {}
        }
    }
    out
}

#[cfg(test)]
#[path = "expectation_tests.rs"]
mod tests;
