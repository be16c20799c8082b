// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-touch coverage tracking (§4.9): "anything below 100% fails the
//! test run, reported per-file". This is a touch counter populated by
//! instrumented call sites (the [`cov!`] macro), not a full instrumenting
//! coverage tool -- a module or recipe under test must opt in by marking
//! the lines it wants tracked as reachable, then touching them as control
//! flow passes through.

use indexmap::{IndexMap, IndexSet};

/// Per-file reachable/touched line tracking, accumulated across every test
/// case in a `test run` invocation.
#[derive(Default)]
pub struct CoverageTracker {
    reachable: IndexMap<String, IndexSet<u32>>,
    touched: IndexMap<String, IndexSet<u32>>,
}

impl CoverageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a line as part of the reachable set for a file, typically
    /// called once per recipe/module source at registration time.
    pub fn declare_reachable(&mut self, file: impl Into<String>, line: u32) {
        self.reachable.entry(file.into()).or_default().insert(line);
    }

    /// Record that control flow passed through `file:line` during a test.
    pub fn touch(&mut self, file: impl Into<String>, line: u32) {
        self.touched.entry(file.into()).or_default().insert(line);
    }

    /// Per-file `(touched, reachable)` counts, in declaration order.
    pub fn report(&self) -> Vec<FileCoverage> {
        self.reachable
            .iter()
            .map(|(file, reachable)| {
                let touched = self.touched.get(file).cloned().unwrap_or_default();
                let missed: Vec<u32> = reachable.difference(&touched).copied().collect();
                FileCoverage {
                    file: file.clone(),
                    reachable: reachable.len(),
                    touched: reachable.intersection(&touched).count(),
                    missed_lines: missed,
                }
            })
            .collect()
    }

    /// Whether every declared line, in every file, was touched by at least
    /// one test case.
    pub fn is_complete(&self) -> bool {
        self.report().iter().all(|f| f.missed_lines.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCoverage {
    pub file: String,
    pub reachable: usize,
    pub touched: usize,
    pub missed_lines: Vec<u32>,
}

/// Record that the current line was reached, against a shared tracker
/// (§4.9 coverage-by-file). This only touches -- it never declares a line
/// reachable. Declaring is a separate, execution-independent step (see
/// [`declare_cov!`]): a line a test run never happens to take must still
/// show up as *missed*, not vanish from the reachable set just because
/// nothing touched it.
#[macro_export]
macro_rules! cov {
    ($tracker:expr) => {{
        $tracker.lock().touch(file!(), line!());
    }};
}

/// Register one `cov!` call site as reachable, independent of whether any
/// test run actually executes it (§4.9 "registration pass over each
/// recipe's tracked lines"). `$line` is the literal line number of the
/// corresponding `cov!` invocation in this file -- kept in sync by hand,
/// the same way a recipe's own registration table lists its coverage
/// points once up front rather than discovering them by running code.
#[macro_export]
macro_rules! declare_cov {
    ($tracker:expr, $line:expr) => {{
        $tracker.lock().declare_reachable(file!(), $line);
    }};
}

#[cfg(test)]
#[path = "coverage_tests.rs"]
mod tests;
