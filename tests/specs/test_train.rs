//! §8 round-trip law: training then running a simulation test yields no
//! expectation diff.

use crate::prelude::rcp_in;
use tempfile::tempdir;

#[test]
fn train_then_run_all_built_in_specs_is_clean() {
    let dir = tempdir().unwrap();

    let trained = rcp_in(dir.path()).args(["test", "train"]).assert().success();
    let trained_out = String::from_utf8_lossy(&trained.get_output().stdout).to_string();
    assert!(trained_out.contains("trained hello::basic"), "{trained_out}");

    let run = rcp_in(dir.path()).args(["test", "run"]).assert().success();
    let run_out = String::from_utf8_lossy(&run.get_output().stdout).to_string();
    assert!(!run_out.contains("FAILED"), "{run_out}");
    assert!(run_out.ends_with("0 failed\n") || run_out.contains(" run, 0 failed"), "{run_out}");
}

#[test]
fn filter_narrows_to_matching_specs_only() {
    let dir = tempdir().unwrap();
    rcp_in(dir.path()).args(["test", "train", "--filter", "^hello::"]).assert().success();
    let assert = rcp_in(dir.path())
        .args(["test", "run", "--filter", "^hello::"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("1 run, 0 failed"), "{stdout}");
}
