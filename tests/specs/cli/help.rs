use crate::prelude::rcp;

#[test]
fn top_level_help_lists_every_subcommand() {
    let assert = rcp().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for sub in [
        "run",
        "test",
        "fetch",
        "bundle",
        "doc",
        "lint",
        "analyze",
        "manual-roll",
        "autoroll",
    ] {
        assert!(stdout.contains(sub), "help text missing `{sub}`:\n{stdout}");
    }
}

#[test]
fn run_help_describes_properties_file_flag() {
    let assert = rcp().args(["run", "--help"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("--properties-file"));
}

#[test]
fn no_subcommand_exits_nonzero_with_usage() {
    rcp().assert().failure();
}
