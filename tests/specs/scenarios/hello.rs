//! Scenario A (§8): `DEPS=[]`, one step `("say hello", ["echo","hello","world"])`.

use crate::prelude::rcp_in;
use tempfile::tempdir;

#[test]
fn hello_emits_opened_log_line_and_closed_success_then_recipe_ended() {
    let dir = tempdir().unwrap();
    let assert = rcp_in(dir.path()).args(["run", "hello"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    assert!(stdout.contains("@@@STEP_OPEN@say hello@echo hello world@@@"), "{stdout}");
    assert!(stdout.contains("@@@STEP_LOG_LINE@say hello@stdout@hello world@@@"), "{stdout}");
    assert!(stdout.contains("@@@STEP_CLOSED@say hello@success@@@"), "{stdout}");
    assert!(stdout.contains("@@@RECIPE_ENDED@success@"), "{stdout}");

    let open_pos = stdout.find("STEP_OPEN").unwrap();
    let log_pos = stdout.find("STEP_LOG_LINE").unwrap();
    let closed_pos = stdout.find("STEP_CLOSED").unwrap();
    let ended_pos = stdout.find("RECIPE_ENDED").unwrap();
    assert!(open_pos < log_pos && log_pos < closed_pos && closed_pos < ended_pos, "{stdout}");
}
