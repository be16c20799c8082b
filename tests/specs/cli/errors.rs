use crate::prelude::rcp_in;
use tempfile::tempdir;

#[test]
fn run_unknown_recipe_fails_with_known_recipe_list() {
    let dir = tempdir().unwrap();
    let assert = rcp_in(dir.path()).args(["run", "does-not-exist"]).assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("unknown recipe"), "stderr: {stderr}");
    assert!(stderr.contains("hello"), "stderr should list available recipes: {stderr}");
}

#[test]
fn fetch_without_manifest_fails() {
    let dir = tempdir().unwrap();
    rcp_in(dir.path()).arg("fetch").assert().failure();
}

#[test]
fn manual_roll_rejects_undeclared_dependency() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("infra/config")).unwrap();
    std::fs::write(
        dir.path().join("infra/config/recipes.cfg"),
        r#"
api_version = 2
repo_name = "example"

[[deps]]
name = "rcp-engine"
url = "https://example.invalid/rcp-engine"
branch = "main"
revision = "deadbeef"
"#,
    )
    .unwrap();

    let assert = rcp_in(dir.path())
        .args(["manual-roll", "nonexistent-dep", "cafef00d"])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("nonexistent-dep"), "stderr: {stderr}");
}
