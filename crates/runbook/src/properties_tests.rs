// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn module_schema() -> Schema {
    Schema::new()
        .with_field("greeting", json!("hi"))
        .with_field("loud", json!(false))
}

#[test]
fn dollar_keys_route_to_module_properties() {
    let raw = json!({
        "$repo/greeter": { "greeting": "hello" },
        "name": "world",
    });
    let mut module_properties = IndexMap::new();
    module_properties.insert("repo/greeter".to_string(), module_schema());
    let schemas = SchemaSet {
        recipe_properties: None,
        module_properties,
        global_properties: IndexMap::new(),
        env_properties: IndexMap::new(),
    };

    let binding = bind(&raw, &HashMap::new(), &schemas).unwrap();
    assert_eq!(binding.module_properties["repo/greeter"]["greeting"], json!("hello"));
    assert_eq!(binding.module_properties["repo/greeter"]["loud"], json!(false));
    assert_eq!(binding.recipe_properties["name"], json!("world"));
}

#[test]
fn missing_dollar_key_uses_all_defaults() {
    let raw = json!({});
    let mut module_properties = IndexMap::new();
    module_properties.insert("repo/greeter".to_string(), module_schema());
    let schemas = SchemaSet {
        recipe_properties: None,
        module_properties,
        global_properties: IndexMap::new(),
        env_properties: IndexMap::new(),
    };

    let binding = bind(&raw, &HashMap::new(), &schemas).unwrap();
    assert_eq!(binding.module_properties["repo/greeter"]["greeting"], json!("hi"));
}

#[test]
fn unknown_field_is_a_decode_error() {
    let raw = json!({ "$repo/greeter": { "nonexistent": 1 } });
    let mut module_properties = IndexMap::new();
    module_properties.insert("repo/greeter".to_string(), module_schema());
    let schemas = SchemaSet {
        recipe_properties: None,
        module_properties,
        global_properties: IndexMap::new(),
        env_properties: IndexMap::new(),
    };

    let err = bind(&raw, &HashMap::new(), &schemas).unwrap_err();
    assert!(matches!(err, BindError::UnknownField { .. }));
}

#[test]
fn env_properties_decode_from_uppercased_env() {
    let mut env = HashMap::new();
    env.insert("my_key".to_string(), "value".to_string());
    let mut env_properties = IndexMap::new();
    env_properties.insert(
        "repo/env_mod".to_string(),
        Schema::new().with_field("MY_KEY", json!(null)),
    );
    let schemas = SchemaSet {
        recipe_properties: None,
        module_properties: IndexMap::new(),
        global_properties: IndexMap::new(),
        env_properties,
    };

    let binding = bind(&json!({}), &env, &schemas).unwrap();
    assert_eq!(binding.env_properties["repo/env_mod"]["MY_KEY"], json!("value"));
}

#[test]
fn global_properties_read_from_shared_top_keys() {
    let raw = json!({ "feature_flag": true, "name": "world" });
    let mut global_properties = IndexMap::new();
    global_properties.insert(
        "repo/flags".to_string(),
        Schema::new().with_field("feature_flag", json!(false)),
    );
    let schemas = SchemaSet {
        recipe_properties: None,
        module_properties: IndexMap::new(),
        global_properties,
        env_properties: IndexMap::new(),
    };

    let binding = bind(&raw, &HashMap::new(), &schemas).unwrap();
    assert_eq!(binding.global_properties["repo/flags"]["feature_flag"], json!(true));
    assert_eq!(binding.recipe_properties["feature_flag"], json!(true));
}
