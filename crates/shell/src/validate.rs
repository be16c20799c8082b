// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step-shape validation independent of any particular invocation (§8
//! boundary behaviors): an empty `cmd`, or a child step name whose parent
//! was never emitted, is a load error rather than a runtime failure.

use rcp_core::Step;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StepShapeError {
    #[error("step `{0}` has an empty cmd")]
    EmptyCmd(String),
    #[error("step `{child}` names parent `{parent}` which was never emitted")]
    OrphanChild { child: String, parent: String },
}

pub fn validate_cmd_non_empty(step: &Step) -> Result<(), StepShapeError> {
    if step.cmd.is_empty() {
        return Err(StepShapeError::EmptyCmd(step.name.clone()));
    }
    Ok(())
}

/// Validate that every step whose name encodes a parent (`"parent|child"`)
/// appears after a step literally named `parent` in `emitted_so_far`.
pub fn validate_parent_precedes_child(
    step: &Step,
    emitted_so_far: &HashSet<String>,
) -> Result<(), StepShapeError> {
    if let Some(parent) = step.parent_name() {
        if !emitted_so_far.contains(parent) {
            return Err(StepShapeError::OrphanChild {
                child: step.name.clone(),
                parent: parent.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
