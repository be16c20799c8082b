// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The module arena (§4.5 steps 4-5, §9 "arena-owned construction"):
//! constructs every module reachable from a recipe's `DEPS` in topological
//! order, injecting each dependency's already-constructed singleton, then
//! runs the `initialize` pass in the same order.

use crate::module::{DepsView, Instance, ModuleDef};
use indexmap::IndexMap;
use rcp_core::{ModuleRef, RecipeError};
use rcp_runbook::{DepsEntry, ModuleSource, PropertyBinding, ResolvedModule};
use std::sync::Arc;

/// Registers every [`ModuleDef`] a recipe invocation may depend on, and
/// doubles as the [`ModuleSource`] the dependency resolver reads `DEPS`
/// from (§4.5 inputs).
#[derive(Default)]
pub struct ModuleRegistry {
    defs: IndexMap<ModuleRef, Arc<dyn ModuleDef>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: Arc<dyn ModuleDef>) -> &mut Self {
        self.defs.insert(def.module_ref(), def);
        self
    }

    pub fn get(&self, module: &ModuleRef) -> Option<&Arc<dyn ModuleDef>> {
        self.defs.get(module)
    }

    pub fn contains(&self, module: &ModuleRef) -> bool {
        self.defs.contains_key(module)
    }
}

impl ModuleSource for ModuleRegistry {
    fn deps(&self, module: &ModuleRef) -> Option<Vec<DepsEntry>> {
        self.defs.get(module).map(|d| d.deps())
    }
}

/// The constructed singletons for one recipe invocation, addressable by
/// [`ModuleRef`] (§3 "modules and their api singletons are instantiated once
/// per recipe invocation").
#[derive(Default)]
pub struct ModuleArena {
    instances: IndexMap<ModuleRef, Instance>,
}

impl ModuleArena {
    pub fn get<T: Send + Sync + 'static>(&self, module: &ModuleRef) -> Option<Arc<T>> {
        self.instances.get(module)?.clone().downcast::<T>().ok()
    }

    pub fn contains(&self, module: &ModuleRef) -> bool {
        self.instances.contains_key(module)
    }
}

/// Construct every module in `order` (already topologically sorted by
/// [`rcp_runbook::resolve`]), then run the `initialize` pass over the same
/// order (§4.5 steps 4-5).
pub fn instantiate(
    order: &[ResolvedModule],
    registry: &ModuleRegistry,
    binding: &PropertyBinding,
) -> Result<ModuleArena, RecipeError> {
    let mut instances: IndexMap<ModuleRef, Instance> = IndexMap::new();
    let mut views: IndexMap<ModuleRef, DepsView> = IndexMap::new();

    for resolved in order {
        let def = registry.get(&resolved.module).ok_or_else(|| RecipeError::Load {
            path: resolved.module.qualified(),
            message: "module is declared as a DEPS entry but has no registered implementation".to_string(),
        })?;

        let mut view = DepsView::default();
        for entry in &resolved.deps {
            let dep_instance = instances.get(&entry.module).ok_or_else(|| {
                RecipeError::Internal(format!(
                    "dependency `{}` of `{}` was not constructed before its dependent (resolver ordering bug)",
                    entry.module, resolved.module
                ))
            })?;
            view.insert(entry.alias.clone(), dep_instance.clone());
        }

        let key = resolved.module.qualified();
        let properties = binding
            .module_properties
            .get(&key)
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        let global_properties = binding
            .global_properties
            .get(&key)
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        let env_properties = binding
            .env_properties
            .get(&key)
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        let instance = def.construct(&view, &properties, &global_properties, &env_properties);
        instances.insert(resolved.module.clone(), instance);
        views.insert(resolved.module.clone(), view);
    }

    for resolved in order {
        let def = &registry.defs[&resolved.module];
        let instance = &instances[&resolved.module];
        let view = &views[&resolved.module];
        def.initialize(instance, view);
    }

    Ok(ModuleArena { instances })
}

#[cfg(test)]
#[path = "arena_tests.rs"]
mod tests;
