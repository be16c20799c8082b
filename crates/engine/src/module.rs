// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module definitions and the dependency-injection view passed to each
//! module's `api_factory` at construction time (§3 Module, §4.5 step 4).
//!
//! §9's design note replaces reflective, name-based attribute lookup on an
//! injected `api` bag with a typed capability lookup: each dependency is
//! exposed under its local alias as an `Arc<dyn Any + Send + Sync>`, and the
//! caller downcasts to the concrete `ApiObject` type it statically expects.
//! This keeps singleton sharing (two dependents of the same module see the
//! same instance) without requiring compile-time codegen from `DEPS`.

use indexmap::IndexMap;
use rcp_runbook::Schema;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// A type-erased, reference-counted module instance (an `ApiObject`).
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Exposes each dependency of one module under its local alias (§4.5 step
/// 4). Built incrementally by [`crate::arena::instantiate`] as modules are
/// constructed in topological order, so a module's `deps_view` only ever
/// contains already-constructed singletons.
#[derive(Clone, Default)]
pub struct DepsView {
    by_alias: IndexMap<String, Instance>,
}

impl DepsView {
    pub fn insert(&mut self, alias: impl Into<String>, instance: Instance) {
        self.by_alias.insert(alias.into(), instance);
    }

    /// Look up a dependency by local alias, downcasting to the concrete
    /// `ApiObject` type the caller expects. Returns `None` if the alias is
    /// absent or the instance is a different concrete type than `T`.
    pub fn get<T: Send + Sync + 'static>(&self, alias: &str) -> Option<Arc<T>> {
        self.by_alias.get(alias)?.clone().downcast::<T>().ok()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.by_alias.contains_key(alias)
    }
}

/// One module's construction recipe (§3 Module `api_factory`, §4.5 step 4).
///
/// Implementations are typically a thin struct capturing nothing but a
/// `ModuleRef` and a closure-like `construct`/`initialize` pair; the engine
/// owns exactly one instance of the resulting `ApiObject` per recipe
/// invocation (§9 "arena-owned construction").
pub trait ModuleDef: Send + Sync {
    fn module_ref(&self) -> rcp_core::ModuleRef;

    /// Declared `DEPS`, already resolved to `(alias, ModuleRef)` pairs.
    fn deps(&self) -> Vec<rcp_runbook::DepsEntry>;

    fn properties_schema(&self) -> Option<Schema> {
        None
    }

    fn global_properties_schema(&self) -> Option<Schema> {
        None
    }

    fn env_properties_schema(&self) -> Option<Schema> {
        None
    }

    /// Build this module's `ApiObject`. `properties`/`global_properties`/
    /// `env_properties` are this module's decoded schema instances (each
    /// `Value::Null` if the module declared no schema of that kind).
    fn construct(
        &self,
        deps: &DepsView,
        properties: &Value,
        global_properties: &Value,
        env_properties: &Value,
    ) -> Instance;

    /// Invoked once every module in the graph has been constructed, in the
    /// same topological order (§4.5 step 5) -- at this point `instance` may
    /// freely call through any of `deps`.
    fn initialize(&self, _instance: &Instance, _deps: &DepsView) {}
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
