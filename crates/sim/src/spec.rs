// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single simulation test case (§4.9): the inputs a recipe's `gen_tests`
//! generator yields, bundled with its mocked step data, mocked filesystem
//! state, and post-process assertion hooks.

use crate::check::CheckCtx;
use indexmap::IndexMap;
use rcp_adapters::MockStepData;
use rcp_storage::StepView;
use serde_json::Value;
use std::path::PathBuf;

/// Simulated operating environment a test case runs against (§6 platform
/// simulation). Exposed to the recipe/modules under test as `ENV_PROPERTIES`
/// overrides rather than a special-cased API, matching how the rest of the
/// engine threads environment state.
#[derive(Debug, Clone)]
pub struct PlatformSim {
    pub os_name: String,
    pub bits: u8,
    pub arch: String,
}

impl Default for PlatformSim {
    fn default() -> Self {
        Self {
            os_name: "linux".to_string(),
            bits: 64,
            arch: "x86_64".to_string(),
        }
    }
}

impl PlatformSim {
    pub fn as_env(&self) -> Vec<(String, String)> {
        vec![
            ("PLATFORM_OS".to_string(), self.os_name.clone()),
            ("PLATFORM_BITS".to_string(), self.bits.to_string()),
            ("PLATFORM_ARCH".to_string(), self.arch.clone()),
        ]
    }
}

/// Outcome of a post-process hook: either it lets the harness continue to
/// the golden comparison, or it drops the expectation entirely (the test
/// still ran and its hooks still get to assert, but no golden file is
/// compared or trained).
pub enum HookOutcome {
    Continue,
    DropExpectation,
}

/// A callable that inspects the recorded step views, in emission order, and
/// may make assertions through `check_fn` or filter (drop) the golden
/// comparison (§4.9 "post-process hooks").
pub type PostProcessHook = Box<dyn Fn(&CheckCtx, &IndexMap<String, StepView>) -> HookOutcome + Send + Sync>;

/// One test specification, as a recipe's `gen_tests` generator would yield
/// it (§4.9).
pub struct TestSpec {
    pub name: String,
    pub properties: Value,
    pub env: std::collections::HashMap<String, String>,
    mocks: IndexMap<String, MockStepData>,
    present_paths: Vec<PathBuf>,
    pub platform: PlatformSim,
    hooks: Vec<PostProcessHook>,
    pub expect_error: Option<String>,
}

impl TestSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Value::Null,
            env: std::collections::HashMap::new(),
            mocks: IndexMap::new(),
            present_paths: Vec::new(),
            platform: PlatformSim::default(),
            hooks: Vec::new(),
            expect_error: None,
        }
    }

    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_mock_step(mut self, name: impl Into<String>, data: MockStepData) -> Self {
        self.mocks.insert(name.into(), data);
        self
    }

    pub fn with_present_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.present_paths.push(path.into());
        self
    }

    pub fn with_platform(mut self, platform: PlatformSim) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_post_process<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CheckCtx, &IndexMap<String, StepView>) -> HookOutcome + Send + Sync + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn expecting_error(mut self, message: impl Into<String>) -> Self {
        self.expect_error = Some(message.into());
        self
    }

    pub fn mocks(&self) -> &IndexMap<String, MockStepData> {
        &self.mocks
    }

    pub fn present_paths(&self) -> &[PathBuf] {
        &self.present_paths
    }

    pub fn hooks(&self) -> &[PostProcessHook] {
        &self.hooks
    }
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
