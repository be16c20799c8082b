// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rcp_core::ModuleRef;
use rcp_runbook::{DepsEntry, PropertyBinding};

struct Base {
    value: u32,
}

struct BaseDef;
impl ModuleDef for BaseDef {
    fn module_ref(&self) -> ModuleRef {
        ModuleRef::new("builtin", "base")
    }
    fn deps(&self) -> Vec<DepsEntry> {
        vec![]
    }
    fn construct(&self, _deps: &DepsView, _p: &serde_json::Value, _g: &serde_json::Value, _e: &serde_json::Value) -> Instance {
        Arc::new(Base { value: 42 })
    }
}

struct Consumer {
    base_value: u32,
}

struct ConsumerDef;
impl ModuleDef for ConsumerDef {
    fn module_ref(&self) -> ModuleRef {
        ModuleRef::new("builtin", "consumer")
    }
    fn deps(&self) -> Vec<DepsEntry> {
        vec![DepsEntry {
            alias: "base".into(),
            module: ModuleRef::new("builtin", "base"),
        }]
    }
    fn construct(&self, deps: &DepsView, _p: &serde_json::Value, _g: &serde_json::Value, _e: &serde_json::Value) -> Instance {
        let base = deps.get::<Base>("base").expect("base must be constructed first");
        Arc::new(Consumer {
            base_value: base.value,
        })
    }
}

#[test]
fn instantiate_in_topological_order_injects_singleton_deps() {
    let mut registry = ModuleRegistry::new();
    registry.register(Arc::new(BaseDef));
    registry.register(Arc::new(ConsumerDef));

    let order = rcp_runbook::resolve(
        &registry,
        &[DepsEntry {
            alias: "consumer".into(),
            module: ModuleRef::new("builtin", "consumer"),
        }],
    )
    .unwrap();

    let arena = instantiate(&order, &registry, &PropertyBinding::default()).unwrap();
    let consumer = arena.get::<Consumer>(&ModuleRef::new("builtin", "consumer")).unwrap();
    assert_eq!(consumer.base_value, 42);
    assert!(arena.contains(&ModuleRef::new("builtin", "base")));
}

#[test]
fn unregistered_dep_is_a_load_error() {
    let mut registry = ModuleRegistry::new();
    registry.register(Arc::new(ConsumerDef));
    // `base` is referenced in ConsumerDef::deps() but never registered.

    let order_result = rcp_runbook::resolve(
        &registry,
        &[DepsEntry {
            alias: "consumer".into(),
            module: ModuleRef::new("builtin", "consumer"),
        }],
    );
    assert!(order_result.is_err(), "resolver should reject an undeclared module");
}
