// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream sink event payloads (§4.3).
//!
//! The sink itself (annotation / structured emitters) lives in `rcp-storage`,
//! which depends on this crate; the event shapes and the `EventSink` trait
//! live here so `StepPresentation` (below, and in `step.rs`) can emit without
//! creating a dependency cycle.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One event in the append-only step lifecycle stream (§4.3 table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepEvent {
    StepOpened {
        name: String,
        cmd: Vec<String>,
        env: Vec<(String, String)>,
        cwd: Option<String>,
    },
    StepLogLine {
        name: String,
        log_name: String,
        line: String,
    },
    StepSetText {
        name: String,
        text: String,
    },
    StepSetSummary {
        name: String,
        summary: String,
    },
    StepSetLink {
        name: String,
        link_name: String,
        url: String,
    },
    StepSetProperty {
        name: String,
        key: String,
        value: Value,
    },
    StepClosed {
        name: String,
        status: StepStatus,
        status_details: Option<String>,
    },
    RecipeEnded {
        status: StepStatus,
        summary: String,
    },
}

/// Final status of a step or recipe (§3 StepPresentation, §8 invariant 6).
///
/// `Pending`/`Running` are open-step states never emitted in a `StepClosed`
/// event; they exist so the engine driver can track in-flight steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Success,
    Failure,
    InfraFailure,
    Warning,
    Exception,
    Canceled,
}

impl StepStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, StepStatus::Pending | StepStatus::Running)
    }

    pub fn is_ok(self) -> bool {
        matches!(self, StepStatus::Success | StepStatus::Warning)
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Success => "success",
            StepStatus::Failure => "failure",
            StepStatus::InfraFailure => "infra_failure",
            StepStatus::Warning => "warning",
            StepStatus::Exception => "exception",
            StepStatus::Canceled => "canceled",
        };
        write!(f, "{}", s)
    }
}

/// Accepts the append-only event sequence described in §4.3.
///
/// Implemented by the annotation emitter and the structured emitter in
/// `rcp-storage`; implemented trivially by the simulation harness to record
/// events into an ordered map for golden comparison.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: StepEvent);
}

/// A sink that drops every event; useful as a default/no-op collaborator.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: StepEvent) {}
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
