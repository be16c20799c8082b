// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine driver (§4.8): resolves repos and modules, compiles schemas,
//! decodes properties, instantiates the dependency graph, runs the
//! recipe's entry point, and finalizes the last open step plus the
//! terminal `recipe_ended` event.

use crate::arena::{self, ModuleArena, ModuleRegistry};
use crate::step_exec::Engine;
use async_trait::async_trait;
use rcp_adapters::StepRunner;
use rcp_core::{Context, EventSink, RecipeError, StepStatus};
use rcp_runbook::{DepsEntry, PropertyBinding, Schema, SchemaSet};
use rcp_shell::PathRegistry;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A recipe: the same shape as a module for dependency-resolution purposes
/// (§3 Recipe) but never injectable into another module's `deps_view`.
#[async_trait]
pub trait Recipe: Send + Sync {
    fn name(&self) -> &str;

    /// Declared `DEPS`, already resolved to `(alias, ModuleRef)` pairs
    /// (§4.5 step 1 -- unqualified entries resolve against this recipe's
    /// own repo).
    fn deps(&self) -> Vec<DepsEntry>;

    fn properties_schema(&self) -> Option<Schema> {
        None
    }

    fn env_properties_schema(&self) -> Option<Schema> {
        None
    }

    /// Run the recipe's `RunSteps` entry point (§4.8 step 4).
    async fn run(&self, rt: &RecipeRuntime) -> Result<RecipeOutcome, RecipeError>;
}

/// The recipe-level terminal outcome a successful `run` reports (§4.8 step
/// 5). An uncaught [`RecipeError`] is mapped to one of these via
/// [`RecipeError::terminal_status`] instead.
#[derive(Debug, Clone)]
pub struct RecipeOutcome {
    pub status: StepStatus,
    pub summary: String,
}

impl RecipeOutcome {
    pub fn success() -> Self {
        Self {
            status: StepStatus::Success,
            summary: String::new(),
        }
    }

    pub fn with_summary(status: StepStatus, summary: impl Into<String>) -> Self {
        Self {
            status,
            summary: summary.into(),
        }
    }
}

/// Everything a running recipe needs: the step engine, the constructed
/// module arena, its own decoded `PROPERTIES`, and the root concurrency
/// context (§3 Context, §4.8). `engine` is `Arc`-owned rather than borrowed
/// so a future spawned off `ConcurrencyCore::spawn` (which requires `F:
/// 'static`, per `tokio::spawn`) can hold its own clone of the engine
/// instead of a stack borrow of it (§4.7 parallel futures).
pub struct RecipeRuntime {
    pub engine: Arc<Engine>,
    pub arena: ModuleArena,
    pub properties: Value,
    pub ctx: Context,
}

impl RecipeRuntime {
    pub fn module<T: Send + Sync + 'static>(&self, module: &rcp_core::ModuleRef) -> Option<Arc<T>> {
        self.arena.get(module)
    }
}

/// Build the combined [`SchemaSet`] for a recipe invocation: the recipe's
/// own schema plus every reachable module's declared schemas (§4.6).
fn build_schema_set(recipe: &dyn Recipe, order: &[rcp_runbook::ResolvedModule], registry: &ModuleRegistry) -> SchemaSet {
    let mut module_properties = indexmap::IndexMap::new();
    let mut global_properties = indexmap::IndexMap::new();
    let mut env_properties = indexmap::IndexMap::new();

    for resolved in order {
        if let Some(def) = registry.get(&resolved.module) {
            let key = resolved.module.qualified();
            if let Some(schema) = def.properties_schema() {
                module_properties.insert(key.clone(), schema);
            }
            if let Some(schema) = def.global_properties_schema() {
                global_properties.insert(key.clone(), schema);
            }
            if let Some(schema) = def.env_properties_schema() {
                env_properties.insert(key, schema);
            }
        }
    }

    SchemaSet {
        recipe_properties: recipe.properties_schema(),
        module_properties,
        global_properties,
        env_properties,
    }
}

/// Run one recipe invocation to completion (§4.8 top-level steps 1-5).
/// Always returns a [`RecipeOutcome`] -- load errors, step failures, and
/// internal errors are all mapped to a terminal status rather than
/// propagated, since the engine driver's job is precisely to perform that
/// mapping before the final `recipe_ended` event goes out.
pub async fn run_recipe(
    recipe: &dyn Recipe,
    registry: &ModuleRegistry,
    raw_properties: &Value,
    process_env: HashMap<String, String>,
    runner: Arc<dyn StepRunner>,
    sink: Arc<dyn EventSink>,
    path_registry: PathRegistry,
) -> RecipeOutcome {
    let engine = Arc::new(Engine::new(runner, sink, path_registry, process_env.clone()));

    let result = run_inner(recipe, registry, raw_properties, &process_env, engine.clone()).await;

    let (status, summary) = match &result {
        Ok(outcome) => (outcome.status, outcome.summary.clone()),
        Err(err) => (err.terminal_status(), err.to_string()),
    };
    engine.finalize(status, summary.clone());
    engine.cleanup_paths();
    RecipeOutcome { status, summary }
}

async fn run_inner(
    recipe: &dyn Recipe,
    registry: &ModuleRegistry,
    raw_properties: &Value,
    process_env: &HashMap<String, String>,
    engine: Arc<Engine>,
) -> Result<RecipeOutcome, RecipeError> {
    let entry_deps = recipe.deps();

    let order = rcp_runbook::resolve(registry, &entry_deps).map_err(|e| RecipeError::Load {
        path: recipe.name().to_string(),
        message: e.to_string(),
    })?;

    let schema_set = build_schema_set(recipe, &order, registry);
    let binding: PropertyBinding =
        rcp_runbook::bind(raw_properties, process_env, &schema_set).map_err(|e| RecipeError::Load {
            path: recipe.name().to_string(),
            message: e.to_string(),
        })?;

    let module_arena = arena::instantiate(&order, registry, &binding)?;

    let rt = RecipeRuntime {
        engine,
        arena: module_arena,
        properties: binding.recipe_properties.clone(),
        ctx: Context::root(),
    };

    recipe.run(&rt).await
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
