// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped concurrency context (§3 Context, §4.7).
//!
//! A `Context` is an immutable value carried through a region of recipe
//! code. Nested scopes produce a new context that inherits and refines its
//! parent; a child's deadline can never exceed its parent's (I-5 in §8).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CancelInner {
    flag: AtomicBool,
    parent: Option<CancelToken>,
}

/// Cooperative cancellation flag shared by a scope and all its children.
///
/// Cancelling is one-directional and sticky: once fired it stays fired for
/// the lifetime of the token. A child token observes its own flag OR its
/// parent's, so a parent-scope cancellation reaches every descendant, while
/// cancelling a child alone leaves siblings and the parent unaffected. A
/// future that has entered cleanup does not observe newly-raised
/// cancellation (callers stop polling `is_cancelled` once inside a
/// finalizer, per §4.7).
#[derive(Clone)]
pub struct CancelToken(Arc<CancelInner>);

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(CancelInner {
            flag: AtomicBool::new(false),
            parent: None,
        }))
    }

    /// A token that is cancelled when `self` is cancelled, or when cancelled
    /// directly -- but cancelling it does not cancel `self`.
    pub fn child(&self) -> Self {
        Self(Arc::new(CancelInner {
            flag: AtomicBool::new(false),
            parent: Some(self.clone()),
        }))
    }

    pub fn cancel(&self) {
        self.0.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.flag.load(Ordering::SeqCst)
            || self.0.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }
}

/// A scoped value carrying deadline, grace period, environment overrides,
/// working-directory override, and a cancellation token.
#[derive(Clone)]
pub struct Context {
    deadline: Option<Instant>,
    grace_period: Duration,
    env_overrides: HashMap<String, String>,
    cwd: Option<std::path::PathBuf>,
    cancel: CancelToken,
}

impl Context {
    /// The root context for a recipe invocation: no deadline, no overrides,
    /// a fresh cancel token.
    pub fn root() -> Self {
        Self {
            deadline: None,
            grace_period: Duration::from_secs(30),
            env_overrides: HashMap::new(),
            cwd: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn cwd(&self) -> Option<&std::path::Path> {
        self.cwd.as_deref()
    }

    pub fn env_overrides(&self) -> &HashMap<String, String> {
        &self.env_overrides
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Time remaining before the deadline elapses, or `None` if unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }

    /// Derive a nested scope. The new deadline is the earlier of `timeout`
    /// (relative to now) and the parent's remaining deadline -- a nested
    /// scope can only tighten, never extend (§4.7, §8 invariant 5). The
    /// child shares the parent's cancel token so an outer cancellation
    /// reaches inward, but additionally gets its own token OR'd in so a
    /// scope-local cancel does not escape to siblings.
    pub fn with_deadline(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) if parent < candidate => Some(parent),
            _ => Some(candidate),
        };
        Self {
            deadline,
            grace_period: self.grace_period,
            env_overrides: self.env_overrides.clone(),
            cwd: self.cwd.clone(),
            cancel: self.cancel.clone(),
        }
    }

    pub fn with_grace_period(&self, grace: Duration) -> Self {
        Self {
            grace_period: grace,
            ..self.clone()
        }
    }

    /// Derive a nested scope with additional environment overrides merged
    /// over the parent's (later entries win on key collision).
    pub fn with_env(&self, overrides: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut env_overrides = self.env_overrides.clone();
        env_overrides.extend(overrides);
        Self {
            env_overrides,
            ..self.clone()
        }
    }

    pub fn with_cwd(&self, cwd: impl Into<std::path::PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
            ..self.clone()
        }
    }

    /// A scope with its own independent cancel token, used to model a child
    /// future that can be cancelled individually without affecting
    /// siblings, while still honoring a parent-wide cancellation.
    pub fn with_child_scope(&self) -> Self {
        Self {
            cancel: self.cancel.child(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
