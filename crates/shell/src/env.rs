// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effective-environment computation for a step invocation (§4.4 step 2).
//!
//! Precedence, low to high: parent process environment, then the context's
//! scoped overrides (§3 Context), then the step's own `env_additions`, then
//! `env_prefixes`/`env_suffixes` applied last so they compose with whatever
//! value is already present (e.g. prepending onto `PATH`).

use std::collections::HashMap;

/// OS path-list separator (`:` on Unix, `;` on Windows), matching the
/// platform's native `PATH`-style joining rule.
#[cfg(windows)]
pub const PATH_LIST_SEP: char = ';';
#[cfg(not(windows))]
pub const PATH_LIST_SEP: char = ':';

/// Build the effective environment for one step.
pub fn build_env(
    parent_env: &HashMap<String, String>,
    context_overrides: &HashMap<String, String>,
    env_additions: &HashMap<String, String>,
    env_prefixes: &HashMap<String, Vec<String>>,
    env_suffixes: &HashMap<String, Vec<String>>,
) -> HashMap<String, String> {
    let mut env = parent_env.clone();
    env.extend(context_overrides.clone());
    env.extend(env_additions.clone());

    for (key, prefixes) in env_prefixes {
        let existing = env.get(key).cloned().unwrap_or_default();
        let mut parts: Vec<String> = prefixes.clone();
        if !existing.is_empty() {
            parts.push(existing);
        }
        env.insert(key.clone(), parts.join(&PATH_LIST_SEP.to_string()));
    }

    for (key, suffixes) in env_suffixes {
        let existing = env.get(key).cloned().unwrap_or_default();
        let mut parts = Vec::new();
        if !existing.is_empty() {
            parts.push(existing);
        }
        parts.extend(suffixes.clone());
        env.insert(key.clone(), parts.join(&PATH_LIST_SEP.to_string()));
    }

    env
}

/// Render an environment map as a sorted `KEY=VALUE` vector, for stable
/// `StepOpened` event payloads (§4.3) and deterministic simulation output
/// (§8 invariant 2).
pub fn env_as_sorted_pairs(env: &HashMap<String, String>) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = env.clone().into_iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
