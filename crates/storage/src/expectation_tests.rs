// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rcp_core::StepStatus;
use tempfile::tempdir;

fn sample() -> BuildPresentation {
    let mut pres = BuildPresentation::new();
    pres.step_opened("say hello", vec!["echo".into(), "hi".into()], vec![], None);
    pres.step_closed("say hello", StepStatus::Success, None);
    pres.recipe_ended(StepStatus::Success, "ok".into());
    pres
}

#[test]
fn save_then_load_roundtrips() {
    let dir = tempdir().unwrap();
    let path = expectation_path(dir.path(), "hello_world");
    let expectation = Expectation::new(sample());
    expectation.save(&path).unwrap();

    let loaded = Expectation::load(&path).unwrap().unwrap();
    assert!(expectation.diff(&loaded.presentation).is_none());
}

#[test]
fn load_missing_file_returns_none() {
    let dir = tempdir().unwrap();
    let path = expectation_path(dir.path(), "nonexistent");
    assert!(Expectation::load(&path).unwrap().is_none());
}

#[test]
fn diff_reports_mismatch() {
    let expectation = Expectation::new(sample());
    let mut other = sample();
    other.recipe_ended(StepStatus::Failure, "boom".into());
    let diff = expectation.diff(&other).unwrap();
    assert!(diff.contains("boom"));
}

#[test]
fn save_is_atomic_via_temp_then_rename() {
    let dir = tempdir().unwrap();
    let path = expectation_path(dir.path(), "hello_world");
    Expectation::new(sample()).save(&path).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
}
