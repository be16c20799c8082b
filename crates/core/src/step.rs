// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step definition, execution result, and the closable presentation handle
//! (§3 Step, ExecutionResult, StepData, StepPresentation).

use crate::stream::{EventSink, StepEvent, StepStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// One argument in a step's `cmd` vector: a literal string or a placeholder
/// identity to be rendered at invocation time (§4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Arg {
    Literal(String),
    Placeholder(PlaceholderId),
}

/// Identity of a placeholder: `(module_name, method_name, optional_subname)`
/// (§4.2). Used both to render the argument and to index the result under
/// `result.<module>.<method>[.<subname>]` on the returned `StepData`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceholderId {
    pub module_name: String,
    pub method_name: String,
    pub subname: Option<String>,
}

impl PlaceholderId {
    pub fn new(module_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            method_name: method_name.into(),
            subname: None,
        }
    }

    pub fn with_subname(mut self, subname: impl Into<String>) -> Self {
        self.subname = Some(subname.into());
        self
    }

    /// The `result.<module>.<method>[.<subname>]` lookup key.
    pub fn lookup_key(&self) -> String {
        match &self.subname {
            Some(sub) => format!("{}.{}.{}", self.module_name, self.method_name, sub),
            None => format!("{}.{}", self.module_name, self.method_name),
        }
    }
}

/// Acceptable exit codes for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OkRet {
    Codes(Vec<i32>),
    Any,
}

impl Default for OkRet {
    fn default() -> Self {
        OkRet::Codes(vec![0])
    }
}

impl OkRet {
    pub fn accepts(&self, retcode: Option<i32>) -> bool {
        match self {
            OkRet::Any => true,
            OkRet::Codes(codes) => retcode.is_some_and(|rc| codes.contains(&rc)),
        }
    }
}

/// A step: one subprocess invocation with its associated configuration
/// (§3). `name` uses `|` to nest under a parent (`"parent|child"`); the
/// module resolver/engine driver enforces that a parent's `StepOpened` event
/// precedes any child's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub cmd: Vec<Arg>,
    #[serde(default)]
    pub env_additions: HashMap<String, String>,
    #[serde(default)]
    pub env_prefixes: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub env_suffixes: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default, with = "opt_duration_ms")]
    pub timeout: Option<Duration>,
    #[serde(default)]
    pub ok_ret: OkRet,
    #[serde(default)]
    pub infra_step: bool,
    #[serde(default)]
    pub stdin: Option<PlaceholderId>,
    #[serde(default)]
    pub stdout: Option<PlaceholderId>,
    #[serde(default)]
    pub stderr: Option<PlaceholderId>,
}

impl Step {
    pub fn new(name: impl Into<String>, cmd: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            cmd,
            env_additions: HashMap::new(),
            env_prefixes: HashMap::new(),
            env_suffixes: HashMap::new(),
            cwd: None,
            timeout: None,
            ok_ret: OkRet::default(),
            infra_step: false,
            stdin: None,
            stdout: None,
            stderr: None,
        }
    }

    /// Parent name for a `"parent|child"`-nested step name, if any.
    pub fn parent_name(&self) -> Option<&str> {
        self.name.rsplit_once('|').map(|(parent, _)| parent)
    }
}

mod opt_duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        d.map(|d| d.as_millis() as u64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

/// The non-raising outcome of attempting to run one step (§3, §4.4).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub retcode: Option<i32>,
    pub had_exception: bool,
    pub exception_reason: String,
    pub was_cancelled: bool,
    pub was_timeout: bool,
}

impl ExecutionResult {
    pub fn success() -> Self {
        Self {
            retcode: Some(0),
            ..Default::default()
        }
    }

    pub fn with_retcode(retcode: i32) -> Self {
        Self {
            retcode: Some(retcode),
            ..Default::default()
        }
    }

    pub fn timeout() -> Self {
        Self {
            retcode: None,
            was_timeout: true,
            ..Default::default()
        }
    }

    pub fn cancelled() -> Self {
        Self {
            retcode: None,
            was_cancelled: true,
            ..Default::default()
        }
    }

    pub fn exception(reason: impl Into<String>) -> Self {
        Self {
            retcode: None,
            had_exception: true,
            exception_reason: reason.into(),
            ..Default::default()
        }
    }

    /// Post-run status mapping (§4.4): timeout/cancellation first, then
    /// exception, then ok_ret/infra_step, matching the priority the engine
    /// driver applies.
    pub fn status(&self, ok_ret: &OkRet, infra_step: bool) -> StepStatus {
        if self.was_timeout || self.was_cancelled {
            return StepStatus::Canceled;
        }
        if self.had_exception {
            return StepStatus::Exception;
        }
        if ok_ret.accepts(self.retcode) {
            return StepStatus::Success;
        }
        if infra_step {
            return StepStatus::InfraFailure;
        }
        StepStatus::Failure
    }
}

#[derive(Debug, Error)]
pub enum PresentationError {
    #[error("presentation for step `{0}` is closed")]
    Closed(String),
}

#[derive(Default)]
struct PresentationFields {
    status: Option<StepStatus>,
    step_text: String,
    step_summary_text: String,
    logs: Vec<(String, String)>,
    links: Vec<(String, String)>,
    properties: HashMap<String, Value>,
}

/// Mutable UI state attached to a step; becomes read-only once the *next*
/// step opens (or the recipe ends). Writes after closing return
/// [`PresentationError::Closed`] rather than writing into limbo (§3, §4.8,
/// design note in §9).
pub struct StepPresentation {
    name: String,
    sink: Arc<dyn EventSink>,
    closed: AtomicBool,
    fields: parking_lot::Mutex<PresentationFields>,
}

impl StepPresentation {
    pub fn new(name: impl Into<String>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            name: name.into(),
            sink,
            closed: AtomicBool::new(false),
            fields: parking_lot::Mutex::new(PresentationFields::default()),
        }
    }

    fn guard(&self) -> Result<(), PresentationError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(PresentationError::Closed(self.name.clone()))
        } else {
            Ok(())
        }
    }

    pub fn log_line(&self, log_name: &str, line: impl Into<String>) -> Result<(), PresentationError> {
        self.guard()?;
        let line = line.into();
        self.fields
            .lock()
            .logs
            .push((log_name.to_string(), line.clone()));
        self.sink.emit(StepEvent::StepLogLine {
            name: self.name.clone(),
            log_name: log_name.to_string(),
            line,
        });
        Ok(())
    }

    pub fn set_text(&self, text: impl Into<String>) -> Result<(), PresentationError> {
        self.guard()?;
        let text = text.into();
        self.fields.lock().step_text = text.clone();
        self.sink.emit(StepEvent::StepSetText {
            name: self.name.clone(),
            text,
        });
        Ok(())
    }

    pub fn set_summary(&self, summary: impl Into<String>) -> Result<(), PresentationError> {
        self.guard()?;
        let summary = summary.into();
        self.fields.lock().step_summary_text = summary.clone();
        self.sink.emit(StepEvent::StepSetSummary {
            name: self.name.clone(),
            summary,
        });
        Ok(())
    }

    pub fn set_link(&self, link_name: &str, url: impl Into<String>) -> Result<(), PresentationError> {
        self.guard()?;
        let url = url.into();
        self.fields
            .lock()
            .links
            .push((link_name.to_string(), url.clone()));
        self.sink.emit(StepEvent::StepSetLink {
            name: self.name.clone(),
            link_name: link_name.to_string(),
            url,
        });
        Ok(())
    }

    pub fn set_property(&self, key: &str, value: Value) -> Result<(), PresentationError> {
        self.guard()?;
        self.fields
            .lock()
            .properties
            .insert(key.to_string(), value.clone());
        self.sink.emit(StepEvent::StepSetProperty {
            name: self.name.clone(),
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    pub fn set_status(&self, status: StepStatus) -> Result<(), PresentationError> {
        self.guard()?;
        self.fields.lock().status = Some(status);
        Ok(())
    }

    pub fn status(&self) -> Option<StepStatus> {
        self.fields.lock().status
    }

    /// Close the presentation and emit its terminal event. Idempotent:
    /// calling it twice only emits once.
    pub fn close(&self, status: StepStatus, status_details: Option<String>) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.fields.lock().status = Some(status);
        self.sink.emit(StepEvent::StepClosed {
            name: self.name.clone(),
            status,
            status_details,
        });
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Returned to user code after a step runs (§3 StepData).
#[derive(Debug, Clone, Default)]
pub struct StepData {
    pub retcode: Option<i32>,
    /// Placeholder results keyed by `result.<module>.<method>[.<subname>]`.
    pub placeholder_results: HashMap<String, Value>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl StepData {
    pub fn placeholder(&self, id: &PlaceholderId) -> Option<&Value> {
        self.placeholder_results.get(&id.lookup_key())
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
