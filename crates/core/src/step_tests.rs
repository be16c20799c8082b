// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::stream::NullSink;
use std::sync::Arc;

#[test]
fn ok_ret_default_accepts_only_zero() {
    let ok = OkRet::default();
    assert!(ok.accepts(Some(0)));
    assert!(!ok.accepts(Some(1)));
    assert!(!ok.accepts(None));
}

#[test]
fn ok_ret_any_accepts_everything() {
    assert!(OkRet::Any.accepts(Some(1)));
    assert!(OkRet::Any.accepts(None));
}

#[test]
fn placeholder_lookup_key_without_subname() {
    let id = PlaceholderId::new("json", "output");
    assert_eq!(id.lookup_key(), "json.output");
}

#[test]
fn placeholder_lookup_key_with_subname() {
    let id = PlaceholderId::new("json", "output").with_subname("extra");
    assert_eq!(id.lookup_key(), "json.output.extra");
}

#[test]
fn parent_name_splits_on_last_pipe() {
    let step = Step::new("a|b|c", vec![]);
    assert_eq!(step.parent_name(), Some("a|b"));
}

#[test]
fn parent_name_none_for_top_level() {
    let step = Step::new("a", vec![]);
    assert_eq!(step.parent_name(), None);
}

#[test]
fn execution_result_status_timeout_beats_exit_code() {
    let result = ExecutionResult {
        retcode: Some(0),
        was_timeout: true,
        ..Default::default()
    };
    assert_eq!(result.status(&OkRet::default(), false), StepStatus::Canceled);
}

#[test]
fn execution_result_status_failure_vs_infra_failure() {
    let result = ExecutionResult::with_retcode(1);
    assert_eq!(result.status(&OkRet::default(), false), StepStatus::Failure);
    assert_eq!(
        result.status(&OkRet::default(), true),
        StepStatus::InfraFailure
    );
}

#[test]
fn execution_result_status_exception_beats_ok_ret_any() {
    let result = ExecutionResult::exception("boom");
    assert_eq!(result.status(&OkRet::Any, false), StepStatus::Exception);
}

#[test]
fn presentation_rejects_writes_after_close() {
    let pres = StepPresentation::new("build", Arc::new(NullSink));
    pres.set_text("building").unwrap();
    pres.close(StepStatus::Success, None);
    assert!(pres.is_closed());
    let err = pres.set_text("too late").unwrap_err();
    assert!(matches!(err, PresentationError::Closed(name) if name == "build"));
}

#[test]
fn presentation_close_is_idempotent() {
    let pres = StepPresentation::new("build", Arc::new(NullSink));
    pres.close(StepStatus::Success, None);
    pres.close(StepStatus::Failure, None);
    // second close is a no-op; status recorded from the first close stands
    assert_eq!(pres.status(), Some(StepStatus::Success));
}

#[test]
fn step_data_placeholder_lookup() {
    let mut data = StepData::default();
    let id = PlaceholderId::new("json", "output");
    data.placeholder_results
        .insert(id.lookup_key(), serde_json::json!({"num_passed": 791}));
    assert_eq!(
        data.placeholder(&id),
        Some(&serde_json::json!({"num_passed": 791}))
    );
}
