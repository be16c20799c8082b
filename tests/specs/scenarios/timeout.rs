//! Scenario E (§8): a step with `cmd=["sleep","60"]` under a 1s deadline
//! and no grace period. The step closes with `was_timeout=true`; the
//! recipe ends `canceled`.

use crate::prelude::rcp_in;
use tempfile::tempdir;

#[test]
fn sleep_step_times_out_and_recipe_ends_canceled() {
    let dir = tempdir().unwrap();
    let assert = rcp_in(dir.path())
        .args(["run", "timeout_demo"])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .code(130);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("@@@STEP_CLOSED@sleep@canceled@@@"), "{stdout}");
    assert!(stdout.contains("@@@RECIPE_ENDED@canceled@"), "{stdout}");
}
