//! Scenario D (§8): two independently-spawned steps; with deterministic
//! round-robin scheduling, step A opens before step B opens and both close
//! before `recipe_ended`.

use crate::prelude::rcp_in;
use tempfile::tempdir;

#[test]
fn both_branches_run_and_close_before_recipe_ends() {
    let dir = tempdir().unwrap();
    let assert = rcp_in(dir.path()).args(["run", "parallel"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    assert!(stdout.contains("STEP_OPEN@branch a@"), "{stdout}");
    assert!(stdout.contains("STEP_OPEN@branch b@"), "{stdout}");
    assert!(stdout.contains("STEP_CLOSED@branch a@success@@@"), "{stdout}");
    assert!(stdout.contains("STEP_CLOSED@branch b@success@@@"), "{stdout}");

    let closed_a = stdout.find("STEP_CLOSED@branch a@").unwrap();
    let closed_b = stdout.find("STEP_CLOSED@branch b@").unwrap();
    let ended = stdout.find("RECIPE_ENDED").unwrap();
    assert!(closed_a < ended && closed_b < ended, "{stdout}");
}
