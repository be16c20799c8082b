//! Scenario B (§8): one step mocked `retcode=1` with `ok_ret=Any`, then a
//! victory/boring branch chosen from the retcode. Exercised through `rcp
//! test run`, which drives the recipe against the simulated step runner's
//! mocked data rather than a real `probe` executable.

use crate::prelude::rcp_in;
use tempfile::tempdir;

#[test]
fn victory_and_boring_specs_each_run_exactly_one_branch() {
    let dir = tempdir().unwrap();
    rcp_in(dir.path()).args(["test", "train", "--filter", "^conditional::"]).assert().success();

    let assert = rcp_in(dir.path())
        .args(["test", "run", "--filter", "^conditional::"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("ok     conditional::victory"), "{stdout}");
    assert!(stdout.contains("ok     conditional::boring"), "{stdout}");
    assert!(stdout.contains("2 run, 0 failed"), "{stdout}");
}
