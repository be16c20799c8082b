// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The step runner boundary (§4.4): takes a fully-rendered command line and
//! produces an [`ExecutionResult`] plus any captured stream bytes. Argument
//! rendering, environment composition, and placeholder materialization all
//! happen upstream in `rcp-shell` / the engine driver; this trait only
//! knows how to run (or simulate running) one already-rendered command.

use async_trait::async_trait;
use rcp_core::ExecutionResult;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// One fully-rendered step, ready to execute.
#[derive(Debug, Clone)]
pub struct StepInvocation {
    /// Full hierarchical step name (`"parent|child"`), used to key mock
    /// data lookups and log lines.
    pub name: String,
    pub argv: Vec<String>,
    pub env: HashMap<String, String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub capture_stdout: bool,
    pub capture_stderr: bool,
    /// Path of the rendered input placeholder to open as the child's stdin
    /// (§4.4 step 1), or `None` for a step with no `stdin` declared.
    pub stdin_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no mock step data registered for `{0}`")]
    MissingMockData(String),
}

/// What a step run produced: the non-raising [`ExecutionResult`] plus any
/// captured stream bytes, which the caller forwards into output
/// placeholders attached to `stdout`/`stderr` (§4.2).
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub result: ExecutionResult,
    pub stdout: Option<Vec<u8>>,
    pub stderr: Option<Vec<u8>>,
}

/// Runs one rendered step and reports its outcome (§4.4).
///
/// Implementations never raise for an ordinary nonzero exit, a timeout, or
/// a cancellation -- those are reported through [`ExecutionResult`]'s
/// fields, matching the "non-raising outcome" contract in §3/§4.4.
/// `RunError` is reserved for infrastructure failures the engine driver
/// cannot attribute to the step itself (e.g. the binary could not be
/// spawned at all).
#[async_trait]
pub trait StepRunner: Send + Sync {
    async fn run(&self, invocation: StepInvocation, cancel: &rcp_core::CancelToken) -> Result<RunOutcome, RunError>;
}
