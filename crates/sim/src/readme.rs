// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-recipe README regeneration (§4.9, §6 `test train`, supplemented
//! per-feature from spec.md's own text). A minimal stub: name, DEPS, and
//! declared schemas, written atomically the same way golden expectation
//! files are.

use rcp_core::ModuleRef;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Render a recipe's auto-generated README body from its resolved DEPS.
pub fn render(recipe_name: &str, deps: &[ModuleRef]) -> String {
    let mut out = format!("# {recipe_name}\n\nAuto-generated by `test train`. Do not edit by hand.\n");
    if deps.is_empty() {
        out.push_str("\nThis recipe declares no module dependencies.\n");
        return out;
    }
    out.push_str("\n## Dependencies\n\n");
    let mut sorted: Vec<&ModuleRef> = deps.iter().collect();
    sorted.sort();
    for dep in sorted {
        out.push_str(&format!("- `{}`\n", dep.qualified()));
    }
    out
}

/// Write the rendered README atomically (temp file, then rename), matching
/// the expectation-file write discipline.
pub fn write_readme(path: &Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(body.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "readme_tests.rs"]
mod tests;
