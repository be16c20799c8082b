// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy (§7).
//!
//! The step runner itself never raises (§4.4); this enum is what the engine
//! driver translates an [`crate::step::ExecutionResult`] (or a load-time
//! failure) into. Each crate that detects one of these conditions defines its
//! own narrower `thiserror` enum and converts into the relevant variant here
//! at the boundary, rather than constructing `RecipeError` directly -- this
//! keeps `match` sites able to distinguish e.g. `StepFailure` from
//! `StepInfraFailure` without downcasting.

use crate::stream::StepStatus;
use thiserror::Error;

/// Top-level error taxonomy a recipe invocation can terminate with.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// Missing module, cyclic DEPS, malformed manifest, schema decode error.
    /// Aborts the run before any step executes.
    #[error("load error at {path}: {message}")]
    Load { path: String, message: String },

    /// Step exited with a code not in `ok_ret` and was not `infra_step`.
    #[error("step `{step}` failed: {message}")]
    StepFailure { step: String, message: String },

    /// Step marked `infra_step` failed, or could not be started at all.
    #[error("step `{step}` infra failure: {message}")]
    StepInfraFailure { step: String, message: String },

    /// Scope deadline elapsed during a step.
    #[error("step `{step}` timed out")]
    Timeout { step: String },

    /// External or parent-scope cancellation.
    #[error("step `{step}` was cancelled")]
    Cancelled { step: String },

    /// An output placeholder failed to parse its file or stream.
    #[error("placeholder `{module}.{method}` on step `{step}` failed to resolve: {message}")]
    PlaceholderResolution {
        step: String,
        module: String,
        method: String,
        message: String,
    },

    /// Test supplied mock data for a step that never ran, or omitted
    /// required mock data. A test-authoring error, not a recipe bug.
    #[error("bad test: {0}")]
    BadTest(String),

    /// Recorded step sequence differs from the golden expectation file.
    #[error("expectation mismatch for `{test_name}`: {diff}")]
    ExpectationMismatch { test_name: String, diff: String },

    /// A violated invariant inside the engine itself.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RecipeError {
    /// Whether this error kind ends the recipe with `infra_failure` status
    /// rather than `failure` (§4.8).
    pub fn is_infra(&self) -> bool {
        matches!(self, RecipeError::StepInfraFailure { .. })
    }

    /// The recipe-level terminal status an uncaught error of this kind
    /// ends the build with (§4.8 "exception-to-status mapping", §7 table).
    pub fn terminal_status(&self) -> StepStatus {
        match self {
            RecipeError::StepFailure { .. } => StepStatus::Failure,
            RecipeError::StepInfraFailure { .. } => StepStatus::InfraFailure,
            RecipeError::Timeout { .. } | RecipeError::Cancelled { .. } => StepStatus::Canceled,
            RecipeError::PlaceholderResolution { .. } => StepStatus::Exception,
            RecipeError::Load { .. }
            | RecipeError::BadTest(_)
            | RecipeError::ExpectationMismatch { .. }
            | RecipeError::Internal(_) => StepStatus::Exception,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
