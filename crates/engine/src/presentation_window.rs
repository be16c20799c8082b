// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The presentation mutability window (§4.8): a step's presentation stays
//! writable after the step itself finishes running, right up until the
//! *next* step opens or the recipe ends -- at which point it closes and
//! further writes raise [`rcp_core::PresentationError::Closed`].

use rcp_core::{StepPresentation, StepStatus};
use std::sync::Arc;

struct Open {
    presentation: Arc<StepPresentation>,
    pending_status: StepStatus,
    pending_details: Option<String>,
}

/// Tracks the single step presentation currently inside its mutability
/// window. Single-threaded-executor-shaped, but kept behind a mutex so it
/// can be shared across concurrently-scheduled futures without requiring
/// every caller to serialize on the engine itself.
#[derive(Default)]
pub struct PresentationWindow {
    current: parking_lot::Mutex<Option<Open>>,
}

impl PresentationWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close whichever step is currently open, using the status it was left
    /// with, then begin the new step's window.
    pub fn open(&self, presentation: Arc<StepPresentation>) {
        self.close_current();
        *self.current.lock() = Some(Open {
            presentation,
            pending_status: StepStatus::Success,
            pending_details: None,
        });
    }

    /// Record the status the currently-open step will close with, without
    /// closing it yet -- the step remains writable until the window moves
    /// on.
    pub fn set_pending_status(&self, status: StepStatus, details: Option<String>) {
        if let Some(open) = self.current.lock().as_mut() {
            open.pending_status = status;
            open.pending_details = details;
        }
    }

    /// Close whatever step is open, emitting its terminal event. Idempotent.
    pub fn close_current(&self) {
        if let Some(open) = self.current.lock().take() {
            open.presentation.close(open.pending_status, open.pending_details);
        }
    }
}

#[cfg(test)]
#[path = "presentation_window_tests.rs"]
mod tests;
