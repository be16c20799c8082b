//! Scenario F (§8): a step's stdout is captured into a JSON output
//! placeholder; a follow-up step reads the decoded value back out.
//! Exercised through `rcp test run`, since the mocked output needs a
//! simulated step runner rather than a real `write-json` executable.

use crate::prelude::rcp_in;
use tempfile::tempdir;

#[test]
fn mocked_output_flows_into_follow_up_step() {
    let dir = tempdir().unwrap();
    rcp_in(dir.path())
        .args(["test", "train", "--filter", "^output_placeholder::"])
        .assert()
        .success();

    let assert = rcp_in(dir.path())
        .args(["test", "run", "--filter", "^output_placeholder::"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("ok     output_placeholder::reads_mocked_output"), "{stdout}");
    assert!(stdout.contains("1 run, 0 failed"), "{stdout}");
}
