//! §7 "expectation mismatch": a golden file that disagrees with a freshly
//! simulated run fails `test run` and is rewritten by `test train`.

use crate::prelude::rcp_in;
use tempfile::tempdir;

#[test]
fn mismatched_golden_fails_run_and_train_rewrites_it() {
    let dir = tempdir().unwrap();
    rcp_in(dir.path()).args(["test", "train", "--filter", "^hello::basic$"]).assert().success();

    let expectation_path = dir.path().join(".rcp/expectations/hello::basic.json");
    let original = std::fs::read_to_string(&expectation_path).unwrap();
    let corrupted = original.replace("\"success\"", "\"failure\"");
    similar_asserts::assert_ne!(original, corrupted);
    std::fs::write(&expectation_path, &corrupted).unwrap();

    let failed = rcp_in(dir.path())
        .args(["test", "run", "--filter", "^hello::basic$"])
        .assert()
        .failure();
    let failed_out = String::from_utf8_lossy(&failed.get_output().stdout).to_string();
    assert!(failed_out.contains("FAILED hello::basic"), "{failed_out}");
    assert!(failed_out.contains("expectation diff"), "{failed_out}");

    rcp_in(dir.path()).args(["test", "train", "--filter", "^hello::basic$"]).assert().success();
    let retrained = std::fs::read_to_string(&expectation_path).unwrap();
    similar_asserts::assert_eq!(retrained, original);
}
