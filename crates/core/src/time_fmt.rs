// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable duration formatting for CLI/log output.

use std::time::Duration;

/// Format a duration as `1h2m3s`-style elapsed text, dropping leading
/// zero-valued units.
pub fn format_elapsed(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{hours}h{mins}m{secs}s")
    } else if mins > 0 {
        format!("{mins}m{secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Format a duration with millisecond precision for sub-second steps.
pub fn format_elapsed_ms(d: Duration) -> String {
    if d.as_secs() > 0 {
        format_elapsed(d)
    } else {
        format!("{}ms", d.as_millis())
    }
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
