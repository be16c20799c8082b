// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The simulated step runner (§4.9): no subprocess is ever spawned. Each
//! step looks up pre-registered mock data by its full hierarchical name
//! and returns it verbatim, the way `test.expect_mock_behavior` wires a
//! recipe's own simulation test expectations.

use crate::runner::{RunError, RunOutcome, StepInvocation, StepRunner};
use async_trait::async_trait;
use parking_lot::Mutex;
use rcp_core::{CancelToken, ExecutionResult};
use std::collections::HashMap;

/// Mocked behavior for one step, registered by the simulation harness
/// before a test begins running a recipe (§4.9).
#[derive(Debug, Clone, Default)]
pub struct MockStepData {
    pub result: ExecutionResult,
    pub stdout: Option<Vec<u8>>,
    pub stderr: Option<Vec<u8>>,
}

impl MockStepData {
    pub fn success() -> Self {
        Self {
            result: ExecutionResult::success(),
            ..Default::default()
        }
    }

    pub fn with_retcode(retcode: i32) -> Self {
        Self {
            result: ExecutionResult::with_retcode(retcode),
            ..Default::default()
        }
    }

    pub fn with_stdout(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stdout = Some(bytes.into());
        self
    }

    pub fn with_stderr(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stderr = Some(bytes.into());
        self
    }
}

/// A [`StepRunner`] whose outcomes come entirely from pre-registered mock
/// data rather than a real subprocess. Steps with no registered mock
/// default to a bare success (retcode 0, no captured output) so a recipe
/// under test doesn't need to mock every trivial step (§4.9).
#[derive(Default)]
pub struct SimulatedStepRunner {
    mocks: Mutex<HashMap<String, MockStepData>>,
}

impl SimulatedStepRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register mock data for a step, keyed by its full hierarchical name.
    pub fn mock_step(&self, name: impl Into<String>, data: MockStepData) {
        self.mocks.lock().insert(name.into(), data);
    }
}

#[async_trait]
impl StepRunner for SimulatedStepRunner {
    async fn run(&self, invocation: StepInvocation, cancel: &CancelToken) -> Result<RunOutcome, RunError> {
        if cancel.is_cancelled() {
            return Ok(RunOutcome {
                result: ExecutionResult::cancelled(),
                stdout: None,
                stderr: None,
            });
        }
        let data = self
            .mocks
            .lock()
            .get(&invocation.name)
            .cloned()
            .unwrap_or_else(MockStepData::success);
        Ok(RunOutcome {
            result: data.result,
            stdout: data.stdout,
            stderr: data.stderr,
        })
    }
}

#[cfg(test)]
#[path = "simulated_tests.rs"]
mod tests;
