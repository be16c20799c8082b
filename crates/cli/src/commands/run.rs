// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rcp run <recipe> [key=value ...]` - run a built-in recipe to completion.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use serde_json::Value;

use crate::registry;

#[derive(Args)]
pub struct RunArgs {
    /// Recipe to run.
    pub recipe: String,

    /// Property overrides, `key=value` (repeatable).
    #[arg(value_parser = parse_key_value)]
    pub properties: Vec<(String, String)>,

    /// JSON file of property overrides, merged under the `key=value` pairs.
    #[arg(long = "properties-file")]
    pub properties_file: Option<std::path::PathBuf>,
}

pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid `{raw}`, expected `key=value`"))
}

fn build_properties(args: &RunArgs) -> Result<Value> {
    let mut properties = match &args.properties_file {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        }
        None => Value::Object(serde_json::Map::new()),
    };
    let object = properties
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("--properties-file must contain a JSON object"))?;
    for (key, value) in &args.properties {
        object.insert(key.clone(), Value::String(value.clone()));
    }
    Ok(properties)
}

pub async fn handle(args: RunArgs) -> Result<()> {
    let Some(recipe) = registry::find(&args.recipe) else {
        bail!(
            "unknown recipe `{}` (available: {})",
            args.recipe,
            registry::names().join(", ")
        );
    };

    let properties = build_properties(&args)?;
    let process_env: HashMap<String, String> = std::env::vars().collect();
    let runner: Arc<dyn rcp_adapters::StepRunner> = Arc::new(rcp_adapters::TracedStepRunner::new(
        rcp_adapters::RealStepRunner::new(Duration::from_secs(30)),
    ));
    let sink = Arc::new(rcp_storage::AnnotationEmitter::new(std::io::stdout()));
    let path_registry = rcp_shell::PathRegistry::real(std::env::current_dir()?);
    let module_registry = registry::module_registry();

    let outcome = rcp_engine::run_recipe(
        &*recipe,
        &module_registry,
        &properties,
        process_env,
        runner,
        sink,
        path_registry,
    )
    .await;

    if !outcome.summary.is_empty() {
        eprintln!("{}", outcome.summary);
    }

    if outcome.status.is_ok() {
        Ok(())
    } else {
        std::process::exit(exit_code_for(outcome.status));
    }
}

fn exit_code_for(status: rcp_core::StepStatus) -> i32 {
    match status {
        rcp_core::StepStatus::Success | rcp_core::StepStatus::Warning => 0,
        rcp_core::StepStatus::Canceled => 130,
        rcp_core::StepStatus::InfraFailure => 2,
        _ => 1,
    }
}
