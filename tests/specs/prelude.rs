//! Shared helpers for the black-box `rcp` CLI specs.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// A fresh `rcp` invocation rooted at the given working directory.
pub fn rcp_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rcp").expect("rcp binary built");
    cmd.current_dir(dir);
    cmd
}

/// A fresh `rcp` invocation in the current working directory, for specs
/// that don't touch the filesystem (pure stdout/stderr/exit-code checks).
pub fn rcp() -> Command {
    Command::cargo_bin("rcp").expect("rcp binary built")
}
