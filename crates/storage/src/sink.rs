// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream sink back-ends (§4.3): the annotation emitter (textual
//! `@@@sentinel@@@` protocol interleaved with captured stdout) and the
//! structured emitter (in-memory build presentation periodically
//! replicated to an external log-streaming service). Both observe the same
//! event sequence and must agree on its content (§4.3, open question in §9
//! left to non-essential fields only).

use crate::presentation::BuildPresentation;
use parking_lot::Mutex;
use rcp_core::{EventSink, StepEvent};
use std::io::Write;

/// Formats each [`StepEvent`] as an `@@@...@@@` sentinel line, the way the
/// annotation protocol interleaves control commands with a step's own
/// stdout (§4.3, §6).
pub struct AnnotationEmitter<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> AnnotationEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    fn sentinel(event: &StepEvent) -> String {
        match event {
            StepEvent::StepOpened { name, cmd, .. } => {
                format!("@@@STEP_OPEN@{}@{}@@@", name, cmd.join(" "))
            }
            StepEvent::StepLogLine { name, log_name, line } => {
                format!("@@@STEP_LOG_LINE@{}@{}@{}@@@", name, log_name, line)
            }
            StepEvent::StepSetText { name, text } => format!("@@@STEP_TEXT@{}@{}@@@", name, text),
            StepEvent::StepSetSummary { name, summary } => {
                format!("@@@STEP_SUMMARY@{}@{}@@@", name, summary)
            }
            StepEvent::StepSetLink { name, link_name, url } => {
                format!("@@@STEP_LINK@{}@{}@{}@@@", name, link_name, url)
            }
            StepEvent::StepSetProperty { name, key, value } => {
                format!("@@@STEP_PROPERTY@{}@{}@{}@@@", name, key, value)
            }
            StepEvent::StepClosed { name, status, .. } => {
                format!("@@@STEP_CLOSED@{}@{}@@@", name, status)
            }
            StepEvent::RecipeEnded { status, summary } => {
                format!("@@@RECIPE_ENDED@{}@{}@@@", status, summary)
            }
        }
    }
}

impl<W: Write + Send> EventSink for AnnotationEmitter<W> {
    fn emit(&self, event: StepEvent) {
        let line = Self::sentinel(&event);
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "{line}");
    }
}

/// Maintains an in-memory [`BuildPresentation`] tree and replicates it to an
/// external sink on demand (§4.3). Unlike the annotation emitter, readers
/// see the latest full tree rather than a textual diff stream.
pub struct StructuredEmitter {
    presentation: Mutex<BuildPresentation>,
}

impl Default for StructuredEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredEmitter {
    pub fn new() -> Self {
        Self {
            presentation: Mutex::new(BuildPresentation::new()),
        }
    }

    /// A snapshot of the presentation tree as it stands right now.
    pub fn snapshot(&self) -> BuildPresentation {
        self.presentation.lock().clone()
    }

    /// Serialize the current tree for replication to an external log
    /// streaming service.
    pub fn replicate(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }
}

impl EventSink for StructuredEmitter {
    fn emit(&self, event: StepEvent) {
        let mut pres = self.presentation.lock();
        match event {
            StepEvent::StepOpened { name, cmd, env, cwd } => pres.step_opened(&name, cmd, env, cwd),
            StepEvent::StepLogLine { name, log_name, line } => pres.log_line(&name, &log_name, line),
            StepEvent::StepSetText { name, text } => pres.set_text(&name, text),
            StepEvent::StepSetSummary { name, summary } => pres.set_summary(&name, summary),
            StepEvent::StepSetLink { name, link_name, url } => pres.set_link(&name, &link_name, url),
            StepEvent::StepSetProperty { name, key, value } => pres.set_property(&name, &key, value),
            StepEvent::StepClosed { name, status, status_details } => {
                pres.step_closed(&name, status, status_details)
            }
            StepEvent::RecipeEnded { status, summary } => pres.recipe_ended(status, summary),
        }
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
