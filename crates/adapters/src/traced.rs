// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing wrapper for any [`StepRunner`] implementation.

use crate::runner::{RunError, RunOutcome, StepInvocation, StepRunner};
use async_trait::async_trait;
use rcp_core::CancelToken;
use tracing::Instrument;

/// Wraps any [`StepRunner`] with consistent observability: a span per step
/// invocation, and a log line recording its outcome.
#[derive(Clone)]
pub struct TracedStepRunner<R> {
    inner: R,
}

impl<R> TracedStepRunner<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: StepRunner> StepRunner for TracedStepRunner<R> {
    async fn run(&self, invocation: StepInvocation, cancel: &CancelToken) -> Result<RunOutcome, RunError> {
        let span = tracing::info_span!("step.run", name = %invocation.name, argc = invocation.argv.len());
        async {
            tracing::info!(argv = ?invocation.argv, "starting");
            let start = std::time::Instant::now();
            let outcome = self.inner.run(invocation, cancel).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &outcome {
                Ok(o) => tracing::info!(retcode = ?o.result.retcode, elapsed_ms, "step finished"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "step run failed"),
            }
            outcome
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
