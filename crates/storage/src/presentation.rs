// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory build presentation: a nested step tree built by replaying the
//! append-only stream sink events (§4.3).

use indexmap::IndexMap;
use rcp_core::StepStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step's presentation, as observed through the stream (§3
/// StepPresentation, normalized for comparison/serialization -- this is
/// "the step dict" referenced in §4.3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepView {
    pub name: String,
    #[serde(default)]
    pub cmd: Vec<String>,
    #[serde(default)]
    pub env: Vec<(String, String)>,
    #[serde(default)]
    pub cwd: Option<String>,
    pub status: Option<StepStatus>,
    #[serde(default)]
    pub status_details: Option<String>,
    #[serde(default)]
    pub step_text: String,
    #[serde(default)]
    pub step_summary_text: String,
    /// Ordered per-log-name line buffers (`stdout`, `stderr`, custom logs).
    #[serde(default)]
    pub logs: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub links: IndexMap<String, String>,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
    /// Children nested under this step via the `"parent|child"` naming
    /// convention (§3 Step), in emission order.
    #[serde(default)]
    pub children: Vec<String>,
}

/// The full build presentation for one recipe invocation: an ordered map of
/// every step seen, keyed by full hierarchical name, plus the terminal
/// recipe-level result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildPresentation {
    pub steps: IndexMap<String, StepView>,
    pub final_status: Option<StepStatus>,
    pub final_summary: String,
}

impl BuildPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_opened(&mut self, name: &str, cmd: Vec<String>, env: Vec<(String, String)>, cwd: Option<String>) {
        let view = StepView {
            name: name.to_string(),
            cmd,
            env,
            cwd,
            ..Default::default()
        };
        if let Some(parent) = name.rsplit_once('|').map(|(p, _)| p.to_string()) {
            if let Some(parent_view) = self.steps.get_mut(&parent) {
                parent_view.children.push(name.to_string());
            }
        }
        self.steps.insert(name.to_string(), view);
    }

    pub fn log_line(&mut self, name: &str, log_name: &str, line: String) {
        if let Some(step) = self.steps.get_mut(name) {
            step.logs.entry(log_name.to_string()).or_default().push(line);
        }
    }

    pub fn set_text(&mut self, name: &str, text: String) {
        if let Some(step) = self.steps.get_mut(name) {
            step.step_text = text;
        }
    }

    pub fn set_summary(&mut self, name: &str, summary: String) {
        if let Some(step) = self.steps.get_mut(name) {
            step.step_summary_text = summary;
        }
    }

    pub fn set_link(&mut self, name: &str, link_name: &str, url: String) {
        if let Some(step) = self.steps.get_mut(name) {
            step.links.insert(link_name.to_string(), url);
        }
    }

    pub fn set_property(&mut self, name: &str, key: &str, value: Value) {
        if let Some(step) = self.steps.get_mut(name) {
            step.properties.insert(key.to_string(), value);
        }
    }

    pub fn step_closed(&mut self, name: &str, status: StepStatus, status_details: Option<String>) {
        if let Some(step) = self.steps.get_mut(name) {
            step.status = Some(status);
            step.status_details = status_details;
        }
    }

    pub fn recipe_ended(&mut self, status: StepStatus, summary: String) {
        self.final_status = Some(status);
        self.final_summary = summary;
    }
}

#[cfg(test)]
#[path = "presentation_tests.rs"]
mod tests;
