// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The cooperative concurrency core (§4.7): recipe code runs as ordinary
//! async Rust, and suspension happens only at the points the design calls
//! out -- step execution, explicit awaits, and sleeps. Embedding this crate
//! in a current-thread tokio runtime gives the single-threaded-executor
//! semantics the design describes; the types here are runtime-flavor
//! agnostic, since that choice belongs to the binary wiring it up.

use rcp_core::{CancelToken, Context, RecipeError};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Drives suspension-point behavior shared by every recipe-facing
/// operation: cooperative sleeps, checkpoints, and scope-local spawns.
#[derive(Clone, Default)]
pub struct ConcurrencyCore;

impl ConcurrencyCore {
    pub fn new() -> Self {
        Self
    }

    /// Spawn a future as an independent, concurrently-scheduled unit (the
    /// recipe-facing "create a future" primitive). The spawned future still
    /// only makes progress at its own suspension points.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::spawn(fut)
    }

    /// A suspension point with no other effect: yields to sibling futures
    /// and raises if the scope has been cancelled since the last checkpoint.
    pub async fn checkpoint(&self, ctx: &Context) -> Result<(), RecipeError> {
        tokio::task::yield_now().await;
        if ctx.is_cancelled() {
            return Err(RecipeError::Cancelled {
                step: "<scope>".to_string(),
            });
        }
        Ok(())
    }

    /// Cooperative sleep: a suspension point that resolves early (with a
    /// cancellation error) if the scope is cancelled while asleep.
    pub async fn sleep(&self, ctx: &Context, duration: Duration) -> Result<(), RecipeError> {
        tokio::select! {
            biased;
            _ = Self::wait_for_cancel(ctx.cancel_token()) => Err(RecipeError::Cancelled { step: "<sleep>".to_string() }),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Run `fut` to completion, racing the scope's deadline. On expiry, the
    /// scope's cancel token is fired so any suspension point `fut` reaches
    /// afterward observes cancellation (§4.7: "the next suspension point
    /// inside it raises a cancellation exception"), and this returns a
    /// [`RecipeError::Timeout`] immediately rather than waiting for `fut` to
    /// notice on its own.
    pub async fn run_scoped<F, T>(&self, ctx: &Context, label: &str, fut: F) -> Result<T, RecipeError>
    where
        F: Future<Output = Result<T, RecipeError>>,
    {
        match ctx.remaining() {
            None => fut.await,
            Some(remaining) => {
                tokio::select! {
                    biased;
                    result = fut => result,
                    _ = tokio::time::sleep(remaining) => {
                        ctx.cancel_token().cancel();
                        Err(RecipeError::Timeout { step: label.to_string() })
                    }
                }
            }
        }
    }

    async fn wait_for_cancel(cancel: &CancelToken) {
        loop {
            if cancel.is_cancelled() {
                return;
            }
            tokio::time::sleep(CANCEL_POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
#[path = "concurrency_tests.rs"]
mod tests;
