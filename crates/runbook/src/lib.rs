// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rcp-runbook: the repository manifest (§6), the module resolver (§4.5),
//! dependency overrides, and the property binder (§4.6).

pub mod graph;
pub mod manifest;
pub mod overrides;
pub mod properties;

pub use graph::{resolve, DepsEntry, ModuleSource, ResolveError, ResolvedModule, StaticModuleSource};
pub use manifest::{DepSpec, Format, ManifestError, RepoManifest};
pub use overrides::Overrides;
pub use properties::{bind, BindError, PropertyBinding, Schema, SchemaSet};
