// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rcp-engine: the concurrency core, module arena, and engine driver that
//! turn a resolved manifest and bound properties into a running recipe
//! invocation.
//!
//! `rcp-core` supplies the value types, `rcp-shell` the placeholder
//! protocol and path registry, `rcp-runbook` the dependency graph and
//! property binder, `rcp-storage` the stream sink backends, and
//! `rcp-adapters` the step runners this crate drives.

pub mod arena;
pub mod concurrency;
pub mod driver;
pub mod module;
pub mod presentation_window;
pub mod step_exec;

pub use arena::{ModuleArena, ModuleRegistry};
pub use concurrency::ConcurrencyCore;
pub use driver::{run_recipe, Recipe, RecipeOutcome, RecipeRuntime};
pub use module::{DepsView, Instance, ModuleDef};
pub use presentation_window::PresentationWindow;
pub use step_exec::Engine;
