// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The simulation harness proper (§4.9): runs a recipe against a
//! [`TestSpec`]'s mocked step data and filesystem, captures the emitted
//! step presentation, runs post-process hooks, and compares (or trains)
//! the golden expectation file.

use crate::check::CheckCtx;
use crate::spec::{HookOutcome, TestSpec};
use rcp_adapters::SimulatedStepRunner;
use rcp_engine::{ModuleRegistry, Recipe};
use rcp_shell::PathRegistry;
use rcp_storage::{Expectation, StructuredEmitter};
use std::path::Path;
use std::sync::Arc;

/// Extends [`Recipe`] with the `gen_tests` generator §4.9 drives the
/// harness from. Recipes that don't need simulation coverage simply don't
/// implement it.
pub trait GenTests: Recipe {
    fn gen_tests(&self) -> Vec<TestSpec>;
}

/// The recorded outcome of running one [`TestSpec`] against a recipe.
pub struct TestOutcome {
    pub name: String,
    pub final_status: rcp_core::StepStatus,
    pub check_failures: Vec<crate::check::CheckFailure>,
    /// `Some(diff)` when a golden expectation file exists and disagrees
    /// with the freshly observed run. `None` covers both "no file yet" and
    /// "ran clean".
    pub expectation_diff: Option<String>,
    pub trained: bool,
    pub error_mismatch: Option<String>,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        self.check_failures.is_empty() && self.expectation_diff.is_none() && self.error_mismatch.is_none()
    }
}

/// Run `spec` against `recipe`, optionally training its golden expectation
/// file (§6 `test train`). `expectation_path` is the file the golden
/// presentation lives at; pass `None` to skip golden comparison entirely
/// (e.g. the recipe has no checked-in expectations yet).
pub async fn run_test(
    recipe: &dyn Recipe,
    registry: &ModuleRegistry,
    spec: &TestSpec,
    expectation_path: Option<&Path>,
    train: bool,
) -> TestOutcome {
    let runner = Arc::new(SimulatedStepRunner::new());
    for (name, data) in spec.mocks() {
        runner.mock_step(name.clone(), data.clone());
    }

    let mut path_registry = PathRegistry::simulated();
    for path in spec.present_paths() {
        path_registry.mark_present(path.clone());
    }

    let mut process_env = spec.env.clone();
    for (k, v) in spec.platform.as_env() {
        process_env.insert(k, v);
    }

    let emitter = Arc::new(StructuredEmitter::new());
    let sink = emitter.clone() as Arc<dyn rcp_core::EventSink>;

    let outcome = rcp_engine::run_recipe(
        recipe,
        registry,
        &spec.properties,
        process_env,
        runner,
        sink,
        path_registry,
    )
    .await;

    let presentation = emitter.snapshot();

    if let Some(expected_message) = &spec.expect_error {
        let error_mismatch = if presentation.final_summary.contains(expected_message.as_str()) {
            None
        } else {
            Some(format!(
                "expected error containing `{expected_message}`, got `{}`",
                presentation.final_summary
            ))
        };
        return TestOutcome {
            name: spec.name.clone(),
            final_status: outcome.status,
            check_failures: Vec::new(),
            expectation_diff: None,
            trained: false,
            error_mismatch,
        };
    }

    let check_ctx = CheckCtx::new();
    let mut dropped = false;
    for hook in spec.hooks() {
        if let HookOutcome::DropExpectation = hook(&check_ctx, &presentation.steps) {
            dropped = true;
        }
    }

    let mut expectation_diff = None;
    let mut trained = false;
    if !dropped {
        if let Some(path) = expectation_path {
            if train {
                if let Ok(()) = Expectation::new(presentation.clone()).save(path) {
                    trained = true;
                }
            } else {
                match Expectation::load(path) {
                    Ok(Some(existing)) => expectation_diff = existing.diff(&presentation),
                    Ok(None) => {
                        expectation_diff = Some(format!(
                            "no expectation file at {}; run with --train to create it",
                            path.display()
                        ))
                    }
                    Err(e) => expectation_diff = Some(format!("failed to load expectation: {e}")),
                }
            }
        }
    }

    TestOutcome {
        name: spec.name.clone(),
        final_status: outcome.status,
        check_failures: check_ctx.failures(),
        expectation_diff,
        trained,
        error_mismatch: None,
    }
}

/// Restrict a set of named specs to those matching `pattern` (§6 `test run
/// --filter regex`). An invalid pattern matches nothing rather than
/// panicking, since `--filter` input comes straight from the CLI.
pub fn filter_by_name<'a>(names: &[&'a str], pattern: &str) -> Vec<&'a str> {
    match regex::Regex::new(pattern) {
        Ok(re) => names.iter().copied().filter(|n| re.is_match(n)).collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
