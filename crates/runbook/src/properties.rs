// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The property binder (§4.6): decodes the raw JSON property tree into
//! per-module and per-recipe typed schemas.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BindError {
    #[error("unknown field `{field}` at `{path}`")]
    UnknownField { path: String, field: String },
    #[error("field `{path}` has the wrong type: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },
}

/// The decoded property tree for one recipe invocation (§3 PropertyBinding,
/// §4.6).
#[derive(Debug, Clone, Default)]
pub struct PropertyBinding {
    /// The recipe's own `PROPERTIES`, decoded from `top_keys` (§4.6 step 4).
    pub recipe_properties: Value,
    /// Per-module `PROPERTIES`, keyed by `$<repo>/<module>` (§4.6 step 2).
    pub module_properties: IndexMap<String, Value>,
    /// Per-module `GLOBAL_PROPERTIES`, decoded from the filtered `top_keys`
    /// (§4.6 step 3).
    pub global_properties: IndexMap<String, Value>,
    /// Per-module `ENV_PROPERTIES`, decoded from uppercased environment
    /// variables (§4.6 step 5).
    pub env_properties: IndexMap<String, Value>,
}

/// A module or recipe's declared schema: the set of known field names and
/// their JSON-encoded defaults for fields the caller omitted.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub defaults: IndexMap<String, Value>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, default: Value) -> Self {
        self.defaults.insert(name.into(), default);
        self
    }

    /// Decode an object against this schema: missing fields get their
    /// default, unknown fields are an error (§4.6: "Unknown fields are a
    /// decode error").
    fn decode(&self, path: &str, object: &serde_json::Map<String, Value>) -> Result<Value, BindError> {
        for key in object.keys() {
            if !self.defaults.contains_key(key) {
                return Err(BindError::UnknownField {
                    path: path.to_string(),
                    field: key.clone(),
                });
            }
        }
        let mut decoded = serde_json::Map::new();
        for (field, default) in &self.defaults {
            let value = object.get(field).cloned().unwrap_or_else(|| default.clone());
            decoded.insert(field.clone(), value);
        }
        Ok(Value::Object(decoded))
    }

    /// Decode, keeping only the fields this schema declares (used for
    /// `GLOBAL_PROPERTIES`, which reads from the shared `top_keys` pool
    /// rather than a dedicated namespace, §4.6 step 3).
    fn decode_filtered(&self, object: &serde_json::Map<String, Value>) -> Value {
        let mut decoded = serde_json::Map::new();
        for (field, default) in &self.defaults {
            let value = object.get(field).cloned().unwrap_or_else(|| default.clone());
            decoded.insert(field.clone(), value);
        }
        Value::Object(decoded)
    }
}

/// The module/recipe schemas a binder decodes against.
pub struct SchemaSet {
    pub recipe_properties: Option<Schema>,
    pub module_properties: IndexMap<String, Schema>,
    pub global_properties: IndexMap<String, Schema>,
    pub env_properties: IndexMap<String, Schema>,
}

/// Decode a raw property tree against the given schemas (§4.6).
pub fn bind(raw: &Value, env: &HashMap<String, String>, schemas: &SchemaSet) -> Result<PropertyBinding, BindError> {
    let object = raw.as_object().cloned().unwrap_or_default();

    let mut dollar_keys = serde_json::Map::new();
    let mut top_keys = serde_json::Map::new();
    for (key, value) in object {
        if let Some(stripped) = key.strip_prefix('$') {
            dollar_keys.insert(stripped.to_string(), value);
        } else {
            top_keys.insert(key, value);
        }
    }

    let mut module_properties = IndexMap::new();
    for (module_key, schema) in &schemas.module_properties {
        if let Some(Value::Object(obj)) = dollar_keys.get(module_key) {
            module_properties.insert(module_key.clone(), schema.decode(&format!("${module_key}"), obj)?);
        } else if let Some(other) = dollar_keys.get(module_key) {
            return Err(BindError::TypeMismatch {
                path: format!("${module_key}"),
                expected: "object".to_string(),
                actual: json_type_name(other),
            });
        } else {
            module_properties.insert(module_key.clone(), schema.decode(&format!("${module_key}"), &serde_json::Map::new())?);
        }
    }

    let mut global_properties = IndexMap::new();
    for (module_key, schema) in &schemas.global_properties {
        global_properties.insert(module_key.clone(), schema.decode_filtered(&top_keys));
    }

    let recipe_properties = match &schemas.recipe_properties {
        Some(schema) => schema.decode("<recipe>", &top_keys)?,
        None => Value::Object(top_keys.clone()),
    };

    let uppercased_env: serde_json::Map<String, Value> = env
        .iter()
        .map(|(k, v)| (k.to_uppercase(), Value::String(v.clone())))
        .collect();
    let mut env_properties = IndexMap::new();
    for (module_key, schema) in &schemas.env_properties {
        env_properties.insert(module_key.clone(), schema.decode_filtered(&uppercased_env));
    }

    Ok(PropertyBinding {
        recipe_properties,
        module_properties,
        global_properties,
        env_properties,
    })
}

fn json_type_name(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

#[cfg(test)]
#[path = "properties_tests.rs"]
mod tests;
