// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const VALID_TOML: &str = r#"
api_version = 2
repo_name = "my_repo"
recipes_path = ""

[[deps]]
name = "engine"
url = "https://example.com/engine.git"
branch = "main"
revision = "deadbeef"
"#;

#[test]
fn parses_valid_toml_manifest() {
    let manifest = RepoManifest::parse(VALID_TOML, Format::Toml, "engine", "recipes.cfg").unwrap();
    assert_eq!(manifest.repo_name, "my_repo");
    assert_eq!(manifest.deps.len(), 1);
}

#[test]
fn rejects_manifest_missing_engine_dep() {
    let toml = r#"
api_version = 2
repo_name = "my_repo"
"#;
    let err = RepoManifest::parse(toml, Format::Toml, "engine", "recipes.cfg").unwrap_err();
    assert!(matches!(err, ManifestError::MissingEngineDep { .. }));
}

#[test]
fn rejects_manifest_with_unpinned_engine_dep() {
    let toml = r#"
api_version = 2
repo_name = "my_repo"

[[deps]]
name = "engine"
url = "https://example.com/engine.git"
revision = ""
"#;
    let err = RepoManifest::parse(toml, Format::Toml, "engine", "recipes.cfg").unwrap_err();
    assert!(matches!(err, ManifestError::MissingEngineDep { .. }));
}

#[test]
fn project_id_alias_is_accepted() {
    let toml = r#"
api_version = 2
project_id = "my_repo"

[[deps]]
name = "engine"
url = "https://example.com/engine.git"
revision = "deadbeef"
"#;
    let manifest = RepoManifest::parse(toml, Format::Toml, "engine", "recipes.cfg").unwrap();
    assert_eq!(manifest.repo_name, "my_repo");
}

#[test]
fn parses_hcl_manifest() {
    let hcl = r#"
api_version = 2
repo_name = "my_repo"

deps {
  name = "engine"
  url = "https://example.com/engine.git"
  revision = "deadbeef"
}
"#;
    let manifest = RepoManifest::parse(hcl, Format::Hcl, "engine", "recipes.cfg").unwrap();
    assert_eq!(manifest.deps[0].name, "engine");
}

#[yare::parameterized(
    toml_engine_only = { Format::Toml, VALID_TOML },
    hcl_engine_only = { Format::Hcl, r#"
api_version = 2
repo_name = "my_repo"

deps {
  name = "engine"
  url = "https://example.com/engine.git"
  revision = "deadbeef"
}
"# },
)]
fn engine_dep_is_required_in_every_format(format: Format, source: &str) {
    let manifest = RepoManifest::parse(source, format, "engine", "recipes.cfg").unwrap();
    assert!(manifest.deps.iter().any(|d| d.name == "engine"));
}
