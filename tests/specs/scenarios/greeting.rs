//! Scenario C (§8): property `target` decoded through a schema, rendered
//! straight into the step's command line.

use crate::prelude::rcp_in;
use tempfile::tempdir;

#[test]
fn default_target_greets_world() {
    let dir = tempdir().unwrap();
    let assert = rcp_in(dir.path()).args(["run", "greeting"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("@@@STEP_LOG_LINE@greet@stdout@Hello World@@@"), "{stdout}");
}

#[test]
fn custom_target_property_overrides_default() {
    let dir = tempdir().unwrap();
    let assert = rcp_in(dir.path())
        .args(["run", "greeting", "target=Bob"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("@@@STEP_LOG_LINE@greet@stdout@Hello Bob@@@"), "{stdout}");
}

#[test]
fn properties_file_is_merged_under_key_value_overrides() {
    let dir = tempdir().unwrap();
    let props_path = dir.path().join("props.json");
    std::fs::write(&props_path, serde_json::json!({"target": "FromFile"}).to_string()).unwrap();

    let assert = rcp_in(dir.path())
        .args(["run", "greeting", "--properties-file"])
        .arg(&props_path)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("@@@STEP_LOG_LINE@greet@stdout@Hello FromFile@@@"), "{stdout}");
}
