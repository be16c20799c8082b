// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The module resolver (§4.5): DEPS parsing, cycle detection, and
//! deterministic topological sort.

use indexmap::{IndexMap, IndexSet};
use rcp_core::ModuleRef;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("module `{0}` declares a DEPS entry on `{1}`, which is not declared anywhere")]
    UnknownModule(ModuleRef, ModuleRef),
    #[error("cyclic DEPS detected, involving: {}", cycle_display(.0))]
    Cycle(Vec<ModuleRef>),
}

fn cycle_display(cycle: &[ModuleRef]) -> String {
    cycle.iter().map(|m| m.qualified()).collect::<Vec<_>>().join(" -> ")
}

/// One `DEPS` entry, either a bare reference or a renamed-alias form
/// (`{alias: "repo/name"}`, §4.5 step 1).
#[derive(Debug, Clone)]
pub struct DepsEntry {
    pub alias: String,
    pub module: ModuleRef,
}

/// A view over every module reachable from the entry recipe: its `DEPS`
/// entries, keyed by [`ModuleRef`] (§4.5 inputs: "a `RecipeDeps` view").
pub trait ModuleSource {
    /// The module's declared DEPS, in declaration order.
    fn deps(&self, module: &ModuleRef) -> Option<Vec<DepsEntry>>;
}

/// A simple in-memory [`ModuleSource`] built from a flat map, useful for
/// tests and for small manifests loaded entirely into memory.
#[derive(Debug, Clone, Default)]
pub struct StaticModuleSource {
    deps: IndexMap<ModuleRef, Vec<DepsEntry>>,
}

impl StaticModuleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a module's dependencies, parsing each raw entry string
    /// against `module`'s own repo (unqualified names resolve there).
    pub fn declare(&mut self, module: ModuleRef, raw_deps: impl IntoIterator<Item = (String, String)>) {
        let entries = raw_deps
            .into_iter()
            .map(|(alias, raw)| DepsEntry {
                module: ModuleRef::parse(&raw, &module.repo),
                alias,
            })
            .collect();
        self.deps.insert(module, entries);
    }
}

impl ModuleSource for StaticModuleSource {
    fn deps(&self, module: &ModuleRef) -> Option<Vec<DepsEntry>> {
        self.deps.get(module).cloned()
    }
}

/// One module's dependency entries after resolution, with its local alias
/// map intact for the dependency-injection `deps_view` (§4.5 step 4).
#[derive(Debug, Clone)]
pub struct ResolvedModule {
    pub module: ModuleRef,
    pub deps: Vec<DepsEntry>,
}

/// Expand DEPS transitively from `entry_deps` and produce a deterministic
/// construction order (§4.5 steps 1-3).
///
/// Ties are broken by `(repo, name)` lexicographic order, matching
/// [`ModuleRef`]'s derived `Ord`.
pub fn resolve(source: &dyn ModuleSource, entry_deps: &[DepsEntry]) -> Result<Vec<ResolvedModule>, ResolveError> {
    let mut reachable: IndexSet<ModuleRef> = IndexSet::new();
    let mut frontier: Vec<ModuleRef> = entry_deps.iter().map(|e| e.module.clone()).collect();
    let mut owners: IndexMap<ModuleRef, ModuleRef> = IndexMap::new();

    while let Some(module) = frontier.pop() {
        if !reachable.insert(module.clone()) {
            continue;
        }
        if let Some(deps) = source.deps(&module) {
            for dep in &deps {
                owners.entry(dep.module.clone()).or_insert_with(|| module.clone());
                frontier.push(dep.module.clone());
            }
        }
    }

    for module in &reachable {
        if source.deps(module).is_none() {
            let owner = owners.get(module).cloned().unwrap_or_else(|| module.clone());
            return Err(ResolveError::UnknownModule(owner, module.clone()));
        }
    }

    let order = topo_sort(&reachable, source)?;
    Ok(order
        .into_iter()
        .map(|module| {
            let deps = source.deps(&module).unwrap_or_default();
            ResolvedModule { module, deps }
        })
        .collect())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Temporary,
    Permanent,
}

fn topo_sort(reachable: &IndexSet<ModuleRef>, source: &dyn ModuleSource) -> Result<Vec<ModuleRef>, ResolveError> {
    let mut sorted: Vec<ModuleRef> = reachable.iter().cloned().collect();
    sorted.sort();

    let mut marks: IndexMap<ModuleRef, Mark> = IndexMap::new();
    let mut order = Vec::with_capacity(sorted.len());
    let mut stack = Vec::new();

    for root in &sorted {
        visit(root, source, &mut marks, &mut order, &mut stack)?;
    }

    Ok(order)
}

fn visit(
    module: &ModuleRef,
    source: &dyn ModuleSource,
    marks: &mut IndexMap<ModuleRef, Mark>,
    order: &mut Vec<ModuleRef>,
    stack: &mut Vec<ModuleRef>,
) -> Result<(), ResolveError> {
    match marks.get(module) {
        Some(Mark::Permanent) => return Ok(()),
        Some(Mark::Temporary) => {
            let start = stack.iter().position(|m| m == module).unwrap_or(0);
            let mut cycle = stack[start..].to_vec();
            cycle.push(module.clone());
            return Err(ResolveError::Cycle(cycle));
        }
        None => {}
    }

    marks.insert(module.clone(), Mark::Temporary);
    stack.push(module.clone());

    let mut deps: Vec<ModuleRef> = source
        .deps(module)
        .unwrap_or_default()
        .into_iter()
        .map(|e| e.module)
        .collect();
    deps.sort();
    for dep in deps {
        visit(&dep, source, marks, order, stack)?;
    }

    stack.pop();
    marks.insert(module.clone(), Mark::Permanent);
    order.push(module.clone());
    Ok(())
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
