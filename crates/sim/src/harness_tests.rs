// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::spec::HookOutcome;
use async_trait::async_trait;
use rcp_adapters::MockStepData;
use rcp_core::{Arg, RecipeError, Step, StepStatus};
use rcp_engine::{RecipeOutcome, RecipeRuntime};
use rcp_runbook::DepsEntry;

struct HelloRecipe;

#[async_trait]
impl Recipe for HelloRecipe {
    fn name(&self) -> &str {
        "hello"
    }

    fn deps(&self) -> Vec<DepsEntry> {
        vec![]
    }

    async fn run(&self, rt: &RecipeRuntime) -> Result<RecipeOutcome, RecipeError> {
        let step = Step::new("say hello", vec![Arg::Literal("echo".into()), Arg::Literal("hi".into())]);
        rt.engine.run_step(step, &rt.ctx, None).await?;
        Ok(RecipeOutcome::success())
    }
}

#[tokio::test]
async fn missing_expectation_file_is_reported_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.expected.json");

    let spec = TestSpec::new("hello_case").with_mock_step("say hello", MockStepData::success());
    let outcome = run_test(&HelloRecipe, &ModuleRegistry::new(), &spec, Some(&path), false).await;

    assert_eq!(outcome.final_status, StepStatus::Success);
    assert!(!outcome.passed());
    assert!(outcome.expectation_diff.unwrap().contains("--train"));
}

#[tokio::test]
async fn training_then_rerunning_produces_a_clean_pass() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.expected.json");

    let spec = TestSpec::new("hello_case").with_mock_step("say hello", MockStepData::success());
    let trained = run_test(&HelloRecipe, &ModuleRegistry::new(), &spec, Some(&path), true).await;
    assert!(trained.trained);

    let rerun = run_test(&HelloRecipe, &ModuleRegistry::new(), &spec, Some(&path), false).await;
    assert!(rerun.passed());
}

#[tokio::test]
async fn changed_behavior_after_training_produces_a_diff() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.expected.json");

    let spec = TestSpec::new("hello_case").with_mock_step("say hello", MockStepData::success());
    run_test(&HelloRecipe, &ModuleRegistry::new(), &spec, Some(&path), true).await;

    let changed_spec = TestSpec::new("hello_case").with_mock_step("say hello", MockStepData::with_retcode(1));
    let outcome = run_test(&HelloRecipe, &ModuleRegistry::new(), &changed_spec, Some(&path), false).await;
    assert!(!outcome.passed());
    assert!(outcome.expectation_diff.is_some());
}

#[tokio::test]
async fn post_process_hook_failure_is_surfaced_as_check_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.expected.json");

    let spec = TestSpec::new("hello_case")
        .with_mock_step("say hello", MockStepData::success())
        .with_post_process(|ctx, steps| {
            crate::check_fn!(ctx, steps.contains_key("does not exist"));
            HookOutcome::Continue
        });

    let outcome = run_test(&HelloRecipe, &ModuleRegistry::new(), &spec, Some(&path), true).await;
    assert!(!outcome.passed());
    assert_eq!(outcome.check_failures.len(), 1);
}

#[tokio::test]
async fn dropped_expectation_skips_golden_comparison() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.expected.json");

    let spec = TestSpec::new("hello_case")
        .with_mock_step("say hello", MockStepData::success())
        .with_post_process(|_ctx, _steps| HookOutcome::DropExpectation);

    let outcome = run_test(&HelloRecipe, &ModuleRegistry::new(), &spec, Some(&path), false).await;
    assert!(outcome.passed());
    assert!(!path.exists());
}

#[tokio::test]
async fn no_expectation_path_never_touches_disk() {
    let spec = TestSpec::new("hello_case").with_mock_step("say hello", MockStepData::success());
    let outcome = run_test(&HelloRecipe, &ModuleRegistry::new(), &spec, None, false).await;
    assert!(outcome.passed());
}

#[test]
fn filter_by_name_selects_matching_names() {
    let names = vec!["hello_case", "goodbye_case", "hello_failure"];
    let selected = filter_by_name(&names, "^hello");
    assert_eq!(selected, vec!["hello_case", "hello_failure"]);
}

#[test]
fn filter_by_name_with_invalid_pattern_matches_nothing() {
    let names = vec!["hello_case"];
    let selected = filter_by_name(&names, "(unclosed");
    assert!(selected.is_empty());
}
