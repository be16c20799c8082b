// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rcp_adapters::{MockStepData, SimulatedStepRunner};
use rcp_core::{EventSink, StepEvent};
use rcp_shell::PathRegistry;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<StepEvent>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<StepEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: StepEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn engine_with(runner: SimulatedStepRunner) -> (Engine, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let engine = Engine::new(
        Arc::new(runner),
        sink.clone() as Arc<dyn rcp_core::EventSink>,
        PathRegistry::simulated(),
        HashMap::new(),
    );
    (engine, sink)
}

fn echo_step(name: &str, args: &[&str]) -> Step {
    Step::new(
        name,
        args.iter().map(|a| Arg::Literal(a.to_string())).collect(),
    )
}

#[tokio::test]
async fn hello_step_emits_opened_log_line_and_closed_success() {
    let runner = SimulatedStepRunner::new();
    runner.mock_step("say hello", MockStepData::success().with_stdout("hello world"));
    let (engine, sink) = engine_with(runner);

    let step = echo_step("say hello", &["echo", "hello", "world"]);
    let data = engine
        .run_step(step, &Context::root(), None)
        .await
        .expect("step should succeed");
    assert_eq!(data.retcode, Some(0));
    engine.finalize(StepStatus::Success, "");

    let events = sink.events();
    assert!(matches!(&events[0], StepEvent::StepOpened { name, cmd, .. }
        if name == "say hello" && cmd == &vec!["echo".to_string(), "hello".to_string(), "world".to_string()]));
    assert!(events.iter().any(|e| matches!(e, StepEvent::StepLogLine { name, log_name, line }
        if name == "say hello" && log_name == "stdout" && line == "hello world")));
    assert!(matches!(events.last().unwrap(), StepEvent::RecipeEnded { status: StepStatus::Success, .. }));
    let closed = events
        .iter()
        .find(|e| matches!(e, StepEvent::StepClosed { .. }))
        .unwrap();
    assert!(matches!(closed, StepEvent::StepClosed { status: StepStatus::Success, .. }));
}

#[tokio::test]
async fn ok_ret_any_never_raises_regardless_of_exit_code() {
    let runner = SimulatedStepRunner::new();
    runner.mock_step("flaky", MockStepData::with_retcode(17));
    let (engine, _sink) = engine_with(runner);

    let mut step = echo_step("flaky", &["false"]);
    step.ok_ret = rcp_core::OkRet::Any;
    let data = engine
        .run_step(step, &Context::root(), None)
        .await
        .expect("ok_ret=any must never raise");
    assert_eq!(data.retcode, Some(17));
}

#[tokio::test]
async fn failing_step_raises_step_failure() {
    let runner = SimulatedStepRunner::new();
    runner.mock_step("boom", MockStepData::with_retcode(1));
    let (engine, _sink) = engine_with(runner);

    let step = echo_step("boom", &["false"]);
    let err = engine.run_step(step, &Context::root(), None).await.unwrap_err();
    assert!(matches!(err, RecipeError::StepFailure { step, .. } if step == "boom"));
}

#[tokio::test]
async fn infra_step_failure_is_a_distinct_kind() {
    let runner = SimulatedStepRunner::new();
    runner.mock_step("upload", MockStepData::with_retcode(1));
    let (engine, _sink) = engine_with(runner);

    let mut step = echo_step("upload", &["false"]);
    step.infra_step = true;
    let err = engine.run_step(step, &Context::root(), None).await.unwrap_err();
    assert!(matches!(err, RecipeError::StepInfraFailure { step, .. } if step == "upload"));
}

#[tokio::test]
async fn empty_cmd_is_a_load_error() {
    let runner = SimulatedStepRunner::new();
    let (engine, _sink) = engine_with(runner);
    let step = Step::new("nothing", vec![]);
    let err = engine.run_step(step, &Context::root(), None).await.unwrap_err();
    assert!(matches!(err, RecipeError::Load { .. }));
}

#[tokio::test]
async fn orphan_child_step_is_a_load_error() {
    let runner = SimulatedStepRunner::new();
    let (engine, _sink) = engine_with(runner);
    let step = echo_step("parent|child", &["echo", "hi"]);
    let err = engine.run_step(step, &Context::root(), None).await.unwrap_err();
    assert!(matches!(err, RecipeError::Load { .. }));
}

#[tokio::test]
async fn cancelled_step_reports_timeout_status() {
    let runner = SimulatedStepRunner::new();
    runner.mock_step("sleep", MockStepData {
        result: rcp_core::ExecutionResult::timeout(),
        stdout: None,
        stderr: None,
    });
    let (engine, sink) = engine_with(runner);

    let step = echo_step("sleep", &["sleep", "60"]);
    let err = engine.run_step(step, &Context::root(), None).await.unwrap_err();
    assert!(matches!(err, RecipeError::Timeout { .. }));
    let closed = sink
        .events()
        .into_iter()
        .find(|e| matches!(e, StepEvent::StepClosed { .. }))
        .unwrap();
    assert!(matches!(closed, StepEvent::StepClosed { status: StepStatus::Canceled, .. }));
}

#[tokio::test]
async fn stdin_placeholder_content_reaches_the_real_child_process() {
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(RecordingSink::default());
    let engine = Engine::new(
        Arc::new(rcp_adapters::RealStepRunner::default()),
        sink as Arc<dyn rcp_core::EventSink>,
        PathRegistry::real(dir.path()),
        HashMap::new(),
    );

    let id = rcp_core::PlaceholderId::new("stdin", "feed");
    let mut step = echo_step("cat-stdin", &["cat"]);
    step.stdin = Some(id);
    let data = engine
        .run_step(step, &Context::root(), Some(b"hello from stdin\n".to_vec()))
        .await
        .expect("cat should succeed");

    assert_eq!(data.retcode, Some(0));
    assert_eq!(data.stdout.as_deref(), Some("hello from stdin\n"));
}

#[tokio::test]
async fn output_placeholder_resolves_json_from_mock_stdout() {
    let runner = SimulatedStepRunner::new();
    runner.mock_step(
        "write-json",
        MockStepData::success().with_stdout(r#"{"num_passed":791}"#),
    );
    let (engine, _sink) = engine_with(runner);

    let id = rcp_core::PlaceholderId::new("json", "output");
    let mut step = echo_step("write-json", &["write-json"]);
    step.stdout = Some(id.clone());
    let data = engine.run_step(step, &Context::root(), None).await.unwrap();
    assert_eq!(
        data.placeholder(&id),
        Some(&serde_json::json!({"num_passed": 791}))
    );
}
