// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The real step runner: spawns an actual subprocess, enforcing the
//! step's timeout and deadline/cancellation from the ambient [`Context`]
//! (§4.4, §4.7). Grace period handling follows §3's "the subprocess is
//! given `grace_period` to exit after being asked to stop before being
//! killed outright".

use crate::runner::{RunError, RunOutcome, StepInvocation, StepRunner};
use async_trait::async_trait;
use rcp_core::{CancelToken, ExecutionResult};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

/// How often the cancellation watch loop polls the token while a child is
/// running. Small enough that cancellation feels immediate, large enough
/// to not spin.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Grace period granted between a cancellation/timeout signal and a hard
/// kill, mirroring [`rcp_core::Context::grace_period`].
pub struct RealStepRunner {
    pub grace_period: Duration,
}

impl Default for RealStepRunner {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(30),
        }
    }
}

impl RealStepRunner {
    pub fn new(grace_period: Duration) -> Self {
        Self { grace_period }
    }

    async fn wait_for_cancel(cancel: &CancelToken) {
        let mut interval = tokio::time::interval(CANCEL_POLL_INTERVAL);
        loop {
            interval.tick().await;
            if cancel.is_cancelled() {
                return;
            }
        }
    }
}

#[async_trait]
impl StepRunner for RealStepRunner {
    async fn run(&self, invocation: StepInvocation, cancel: &CancelToken) -> Result<RunOutcome, RunError> {
        let (program, args) = invocation
            .argv
            .split_first()
            .ok_or_else(|| RunError::MissingMockData(invocation.name.clone()))?;

        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.envs(&invocation.env);
        if let Some(cwd) = &invocation.cwd {
            cmd.current_dir(cwd);
        }
        match &invocation.stdin_path {
            Some(path) => {
                let file = std::fs::File::open(path).map_err(|source| RunError::Spawn {
                    cmd: invocation.argv.join(" "),
                    source,
                })?;
                cmd.stdin(Stdio::from(file));
            }
            None => {
                cmd.stdin(Stdio::null());
            }
        }
        cmd.stdout(if invocation.capture_stdout {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });
        cmd.stderr(if invocation.capture_stderr {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });

        tracing::debug!(step = %invocation.name, program, "spawning step");
        let mut child = cmd.spawn().map_err(|source| RunError::Spawn {
            cmd: invocation.argv.join(" "),
            source,
        })?;

        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();

        let timeout_fut = async {
            match invocation.timeout {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending().await,
            }
        };

        let result = tokio::select! {
            biased;
            status = child.wait() => {
                let status = status.map_err(|source| RunError::Spawn { cmd: invocation.argv.join(" "), source })?;
                ExecutionResult::with_retcode(status.code().unwrap_or(-1))
            }
            _ = timeout_fut => {
                kill_with_grace(&mut child, self.grace_period).await;
                ExecutionResult::timeout()
            }
            _ = Self::wait_for_cancel(cancel) => {
                kill_with_grace(&mut child, self.grace_period).await;
                ExecutionResult::cancelled()
            }
        };

        let stdout = if invocation.capture_stdout {
            Some(read_all(&mut stdout_pipe).await)
        } else {
            None
        };
        let stderr = if invocation.capture_stderr {
            Some(read_all(&mut stderr_pipe).await)
        } else {
            None
        };

        Ok(RunOutcome { result, stdout, stderr })
    }
}

async fn read_all(pipe: &mut Option<impl AsyncReadExt + Unpin>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(p) = pipe {
        let _ = p.read_to_end(&mut buf).await;
    }
    buf
}

/// Terminate the child. `grace` is accepted for API symmetry with
/// [`rcp_core::Context::grace_period`] but unused here: this crate's
/// dependency stack has no safe cross-platform "ask nicely" signal, so
/// expiry goes straight to a hard kill. A step that needs a real SIGTERM
/// handshake should trap it and poll its own deadline instead.
async fn kill_with_grace(child: &mut Child, _grace: Duration) {
    let _ = child.kill().await;
    let _ = child.wait().await;
}

#[cfg(test)]
#[path = "real_tests.rs"]
mod tests;
