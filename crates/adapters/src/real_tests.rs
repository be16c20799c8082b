// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;
use std::time::Duration;

fn invocation(argv: Vec<&str>) -> StepInvocation {
    StepInvocation {
        name: "s".into(),
        argv: argv.into_iter().map(String::from).collect(),
        env: HashMap::new(),
        cwd: None,
        timeout: None,
        capture_stdout: true,
        capture_stderr: true,
        stdin_path: None,
    }
}

#[tokio::test]
async fn runs_successful_command() {
    let runner = RealStepRunner::default();
    let cancel = CancelToken::new();
    let outcome = runner.run(invocation(vec!["true"]), &cancel).await.unwrap();
    assert_eq!(outcome.result.retcode, Some(0));
}

#[tokio::test]
async fn captures_stdout() {
    let runner = RealStepRunner::default();
    let cancel = CancelToken::new();
    let outcome = runner
        .run(invocation(vec!["echo", "hello"]), &cancel)
        .await
        .unwrap();
    assert_eq!(outcome.stdout.as_deref(), Some(b"hello\n".as_slice()));
}

#[tokio::test]
async fn nonzero_exit_reported_without_error() {
    let runner = RealStepRunner::default();
    let cancel = CancelToken::new();
    let outcome = runner.run(invocation(vec!["false"]), &cancel).await.unwrap();
    assert_eq!(outcome.result.retcode, Some(1));
}

#[tokio::test]
async fn timeout_kills_and_reports_was_timeout() {
    let runner = RealStepRunner::new(Duration::from_millis(10));
    let cancel = CancelToken::new();
    let mut inv = invocation(vec!["sleep", "5"]);
    inv.timeout = Some(Duration::from_millis(20));
    let outcome = runner.run(inv, &cancel).await.unwrap();
    assert!(outcome.result.was_timeout);
}

#[tokio::test]
async fn cancellation_kills_and_reports_was_cancelled() {
    let runner = RealStepRunner::default();
    let cancel = CancelToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel_clone.cancel();
    });
    let outcome = runner.run(invocation(vec!["sleep", "5"]), &cancel).await.unwrap();
    assert!(outcome.result.was_cancelled);
}

#[tokio::test]
async fn stdin_path_is_piped_into_the_child() {
    let dir = tempfile::tempdir().unwrap();
    let stdin_file = dir.path().join("stdin.txt");
    std::fs::write(&stdin_file, b"piped content\n").unwrap();

    let runner = RealStepRunner::default();
    let cancel = CancelToken::new();
    let mut inv = invocation(vec!["cat"]);
    inv.stdin_path = Some(stdin_file);
    let outcome = runner.run(inv, &cancel).await.unwrap();

    assert_eq!(outcome.result.retcode, Some(0));
    assert_eq!(outcome.stdout.as_deref(), Some(b"piped content\n".as_slice()));
}

#[tokio::test]
async fn missing_argv_is_an_error() {
    let runner = RealStepRunner::default();
    let cancel = CancelToken::new();
    let result = runner.run(invocation(vec![]), &cancel).await;
    assert!(result.is_err());
}
