// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The step execution pipeline (§4.4 post-run half, §4.8): renders
//! placeholders, composes the effective environment, runs the step through
//! a [`StepRunner`], resolves output placeholders, and maps the outcome
//! into either a [`StepData`] or the appropriate [`RecipeError`] variant.

use crate::concurrency::ConcurrencyCore;
use crate::presentation_window::PresentationWindow;
use rcp_adapters::{RunError, RunOutcome, StepInvocation, StepRunner};
use rcp_core::{
    Arg, Context, ExecutionResult, PlaceholderId, RecipeError, Step, StepData, StepPresentation, StepStatus,
};
use rcp_shell::{
    build_env, env_as_sorted_pairs, validate_cmd_non_empty, validate_parent_precedes_child, InputPlaceholder,
    OutputPlaceholder, OutputSink, PathRegistry, PlaceholderError,
};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

/// Owns everything a run of step-shaped subprocesses needs: the path
/// registry, the configured runner, the event sink, and the presentation
/// mutability window (§4.8). One `Engine` backs one recipe invocation.
pub struct Engine {
    runner: Arc<dyn StepRunner>,
    sink: Arc<dyn rcp_core::EventSink>,
    path_registry: parking_lot::Mutex<PathRegistry>,
    window: PresentationWindow,
    concurrency: ConcurrencyCore,
    parent_env: HashMap<String, String>,
    emitted: parking_lot::Mutex<HashSet<String>>,
}

impl Engine {
    pub fn new(
        runner: Arc<dyn StepRunner>,
        sink: Arc<dyn rcp_core::EventSink>,
        path_registry: PathRegistry,
        parent_env: HashMap<String, String>,
    ) -> Self {
        Self {
            runner,
            sink,
            path_registry: parking_lot::Mutex::new(path_registry),
            window: PresentationWindow::new(),
            concurrency: ConcurrencyCore::new(),
            parent_env,
            emitted: parking_lot::Mutex::new(HashSet::new()),
        }
    }

    pub fn concurrency(&self) -> &ConcurrencyCore {
        &self.concurrency
    }

    pub fn presentation_window(&self) -> &PresentationWindow {
        &self.window
    }

    /// Run one step to completion (§4.4, §4.8). `stdin_content` supplies the
    /// bytes for `step.stdin`, if declared -- rendered as an input
    /// placeholder whose path is opened as the child's actual stdin (§4.4
    /// step 1), then cleaned up once the step has finished running.
    pub async fn run_step(
        &self,
        step: Step,
        ctx: &Context,
        stdin_content: Option<Vec<u8>>,
    ) -> Result<StepData, RecipeError> {
        validate_cmd_non_empty(&step).map_err(|e| RecipeError::Load {
            path: step.name.clone(),
            message: e.to_string(),
        })?;
        {
            let emitted = self.emitted.lock();
            validate_parent_precedes_child(&step, &emitted).map_err(|e| RecipeError::Load {
                path: step.name.clone(),
                message: e.to_string(),
            })?;
        }

        let mut output_placeholders: Vec<OutputPlaceholder> = Vec::new();
        let mut input_placeholder: Option<InputPlaceholder> = None;
        let mut argv = Vec::with_capacity(step.cmd.len());
        {
            let mut registry = self.path_registry.lock();
            for arg in &step.cmd {
                match arg {
                    Arg::Literal(s) => argv.push(s.clone()),
                    Arg::Placeholder(id) => {
                        let mut placeholder = OutputPlaceholder::new(id.clone(), OutputSink::TempFile);
                        let rendered = placeholder
                            .render(&mut registry)
                            .map_err(|e| placeholder_load_error(&step.name, id, e))?;
                        argv.extend(rendered);
                        output_placeholders.push(placeholder);
                    }
                }
            }

            if let Some(id) = &step.stdin {
                if let Some(content) = &stdin_content {
                    let mut input = InputPlaceholder::new(id.clone(), content.clone());
                    input.render(&mut registry).map_err(|e| placeholder_load_error(&step.name, id, e))?;
                    input_placeholder = Some(input);
                }
            }

            if let Some(id) = &step.stdout {
                output_placeholders.push(OutputPlaceholder::new(id.clone(), OutputSink::Stdout));
            }
            if let Some(id) = &step.stderr {
                output_placeholders.push(OutputPlaceholder::new(id.clone(), OutputSink::Stderr));
            }
        }
        let stdin_path = input_placeholder.as_ref().and_then(|p| p.rendered_path().map(PathBuf::from));

        let env = build_env(
            &self.parent_env,
            ctx.env_overrides(),
            &step.env_additions,
            &step.env_prefixes,
            &step.env_suffixes,
        );
        let cwd: Option<PathBuf> = step.cwd.clone().or_else(|| ctx.cwd().map(PathBuf::from));

        self.sink.emit(rcp_core::StepEvent::StepOpened {
            name: step.name.clone(),
            cmd: argv.clone(),
            env: env_as_sorted_pairs(&env),
            cwd: cwd.as_ref().map(|p| p.display().to_string()),
        });
        let presentation = Arc::new(StepPresentation::new(step.name.clone(), self.sink.clone()));
        self.window.open(presentation);
        self.emitted.lock().insert(step.name.clone());

        let timeout = match (step.timeout, ctx.remaining()) {
            (Some(t), Some(r)) => Some(t.min(r)),
            (Some(t), None) => Some(t),
            (None, r) => r,
        };
        let invocation = StepInvocation {
            name: step.name.clone(),
            argv,
            env,
            cwd,
            timeout,
            capture_stdout: true,
            capture_stderr: true,
            stdin_path,
        };

        let outcome = match self.runner.run(invocation, ctx.cancel_token()).await {
            Ok(outcome) => outcome,
            Err(RunError::Spawn { cmd, source }) => {
                self.cleanup_input(&input_placeholder);
                self.finish_step(StepStatus::InfraFailure, Some(source.to_string()));
                return Err(RecipeError::StepInfraFailure {
                    step: step.name.clone(),
                    message: format!("failed to spawn `{cmd}`: {source}"),
                });
            }
            Err(RunError::MissingMockData(name)) => {
                self.cleanup_input(&input_placeholder);
                self.finish_step(StepStatus::InfraFailure, Some(name.clone()));
                return Err(RecipeError::BadTest(format!("no mock step data registered for `{name}`")));
            }
        };
        self.cleanup_input(&input_placeholder);

        self.emit_captured_lines(&step.name, "stdout", outcome.stdout.as_deref());
        self.emit_captured_lines(&step.name, "stderr", outcome.stderr.as_deref());

        self.resolve_outcome(&step, outcome, output_placeholders)
    }

    /// Emit one `step_log_line` event per line of captured output (§4.4
    /// step 4). The real runner currently buffers a stream to completion
    /// rather than delivering it line-by-line as it arrives, so this
    /// replays it after the fact; the simulated runner's mocked output goes
    /// through the same path so both backends agree on the event sequence
    /// (§8 invariant 2).
    fn emit_captured_lines(&self, step_name: &str, log_name: &str, captured: Option<&[u8]>) {
        let Some(bytes) = captured else { return };
        if bytes.is_empty() {
            return;
        }
        for line in String::from_utf8_lossy(bytes).lines() {
            self.sink.emit(rcp_core::StepEvent::StepLogLine {
                name: step_name.to_string(),
                log_name: log_name.to_string(),
                line: line.to_string(),
            });
        }
    }

    /// Release the rendered stdin temp file once the child has run to
    /// completion (§4.2 `cleanup(success)`). Unlike output placeholders,
    /// this must wait until *after* the step finishes -- deleting it
    /// earlier would race the child still reading from it.
    fn cleanup_input(&self, placeholder: &Option<InputPlaceholder>) {
        if let Some(input) = placeholder {
            input.cleanup(&mut self.path_registry.lock(), true);
        }
    }

    fn resolve_outcome(
        &self,
        step: &Step,
        outcome: RunOutcome,
        mut output_placeholders: Vec<OutputPlaceholder>,
    ) -> Result<StepData, RecipeError> {
        let registry = self.path_registry.lock();
        let mut placeholder_results = HashMap::new();
        let mut placeholder_failure: Option<(PlaceholderId, String)> = None;
        for placeholder in &mut output_placeholders {
            let captured = match placeholder.sink {
                OutputSink::Stdout => outcome.stdout.as_deref(),
                OutputSink::Stderr => outcome.stderr.as_deref(),
                OutputSink::TempFile => None,
            };
            match placeholder.result(&registry, captured) {
                Ok(value) => {
                    placeholder_results.insert(placeholder.id.lookup_key(), value);
                }
                Err(e) if placeholder_failure.is_none() => {
                    placeholder_failure = Some((placeholder.id.clone(), e.to_string()));
                }
                Err(_) => {}
            }
        }
        drop(registry);

        let mut status = outcome.result.status(&step.ok_ret, step.infra_step);
        let mut details = None;
        if let Some((id, message)) = &placeholder_failure {
            if !matches!(status, StepStatus::Canceled) {
                status = StepStatus::Exception;
                details = Some(format!("{}: {message}", id.lookup_key()));
            }
        } else if matches!(status, StepStatus::Failure | StepStatus::InfraFailure) {
            details = Some(outcome.result.exception_reason.clone()).filter(|s| !s.is_empty());
        }

        {
            let mut registry = self.path_registry.lock();
            for placeholder in &output_placeholders {
                placeholder.cleanup(&mut registry, status.is_ok());
            }
        }

        self.finish_step(status, details.clone());

        let data = StepData {
            retcode: outcome.result.retcode,
            placeholder_results,
            stdout: outcome.stdout.map(|b| String::from_utf8_lossy(&b).into_owned()),
            stderr: outcome.stderr.map(|b| String::from_utf8_lossy(&b).into_owned()),
        };

        match status {
            StepStatus::Success | StepStatus::Warning => Ok(data),
            StepStatus::Canceled if outcome.result.was_timeout => Err(RecipeError::Timeout {
                step: step.name.clone(),
            }),
            StepStatus::Canceled => Err(RecipeError::Cancelled {
                step: step.name.clone(),
            }),
            StepStatus::Exception => {
                if let Some((id, message)) = placeholder_failure {
                    Err(RecipeError::PlaceholderResolution {
                        step: step.name.clone(),
                        module: id.module_name,
                        method: id.method_name,
                        message,
                    })
                } else {
                    Err(RecipeError::StepFailure {
                        step: step.name.clone(),
                        message: outcome.result.exception_reason,
                    })
                }
            }
            StepStatus::InfraFailure => Err(RecipeError::StepInfraFailure {
                step: step.name.clone(),
                message: details.unwrap_or_default(),
            }),
            StepStatus::Failure => Err(RecipeError::StepFailure {
                step: step.name.clone(),
                message: details.unwrap_or_default(),
            }),
            StepStatus::Pending | StepStatus::Running => Err(RecipeError::Internal(
                "step runner returned a non-terminal status".to_string(),
            )),
        }
    }

    fn finish_step(&self, status: StepStatus, details: Option<String>) {
        self.window.set_pending_status(status, details);
    }

    /// Close the last open step and emit `recipe_ended` (§4.8 step 5).
    pub fn finalize(&self, status: StepStatus, summary: impl Into<String>) {
        self.window.close_current();
        self.sink.emit(rcp_core::StepEvent::RecipeEnded {
            status,
            summary: summary.into(),
        });
    }

    /// Remove every temporary placeholder path created during this
    /// invocation (§4.8 "cleanup"). Always run after `finalize`, regardless
    /// of how the recipe terminated.
    pub fn cleanup_paths(&self) {
        self.path_registry.lock().cleanup_all();
    }
}

fn placeholder_load_error(step: &str, id: &PlaceholderId, err: PlaceholderError) -> RecipeError {
    RecipeError::PlaceholderResolution {
        step: step.to_string(),
        module: id.module_name.clone(),
        method: id.method_name.clone(),
        message: err.to_string(),
    }
}

#[cfg(test)]
#[path = "step_exec_tests.rs"]
mod tests;
