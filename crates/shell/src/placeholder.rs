// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Placeholder protocol (§4.2): typed command-argument stand-ins that
//! materialize to files before a step and parse back into typed values
//! after.

use crate::path::{PathError, PathRegistry};
use rcp_core::PlaceholderId;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaceholderError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("io error rendering placeholder: {0}")]
    Io(#[from] std::io::Error),
    #[error("placeholder `{0}` parse error: {1}")]
    Parse(String, String),
    #[error("placeholder `{0}` read before its step finished")]
    NotYetResolved(String),
    #[error("placeholder `{0}` was already consumed")]
    AlreadyConsumed(String),
    #[error("missing mock data for placeholder `{0}` in simulation")]
    MissingMockData(String),
}

/// Where an output placeholder's bytes come from: a dedicated temp file, or
/// whichever captured stream (stdout/stderr) it is attached to (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSink {
    TempFile,
    Stdout,
    Stderr,
}

/// An input placeholder: produces file content before the step and renders
/// to the file's absolute path.
pub struct InputPlaceholder {
    pub id: PlaceholderId,
    pub content: Vec<u8>,
    rendered_path: Option<PathBuf>,
}

impl InputPlaceholder {
    pub fn new(id: PlaceholderId, content: Vec<u8>) -> Self {
        Self {
            id,
            content,
            rendered_path: None,
        }
    }

    /// Allocate a temp file, write `content`, and return its path as the
    /// single rendered argument.
    pub fn render(&mut self, registry: &mut PathRegistry) -> Result<Vec<String>, PlaceholderError> {
        let path = registry.mkstemp("tmp_base")?;
        if !registry.is_simulated() {
            std::fs::write(&path, &self.content)?;
        }
        self.rendered_path = Some(path.clone());
        Ok(vec![path.display().to_string()])
    }

    /// The file path rendered for the child's stdin, if `render` has run.
    pub fn rendered_path(&self) -> Option<&std::path::Path> {
        self.rendered_path.as_deref()
    }

    /// Unconditionally release the temp file regardless of step outcome
    /// (§4.2 `cleanup(success)`).
    pub fn cleanup(&self, registry: &mut PathRegistry, _success: bool) {
        if let Some(path) = &self.rendered_path {
            if !registry.is_simulated() {
                let _ = std::fs::remove_file(path);
            }
        }
    }
}

/// An output placeholder: allocates a fresh path (or attaches to a captured
/// stream), then parses the result after the step ends.
pub struct OutputPlaceholder {
    pub id: PlaceholderId,
    pub sink: OutputSink,
    rendered_path: Option<PathBuf>,
    resolved: bool,
}

impl OutputPlaceholder {
    pub fn new(id: PlaceholderId, sink: OutputSink) -> Self {
        Self {
            id,
            sink,
            rendered_path: None,
            resolved: false,
        }
    }

    /// Allocate the backing path. Returns no rendered argument when attached
    /// to a captured stream -- the runner redirects the stream itself.
    pub fn render(&mut self, registry: &mut PathRegistry) -> Result<Vec<String>, PlaceholderError> {
        match self.sink {
            OutputSink::TempFile => {
                let path = registry.mkstemp("tmp_base")?;
                self.rendered_path = Some(path.clone());
                Ok(vec![path.display().to_string()])
            }
            OutputSink::Stdout | OutputSink::Stderr => Ok(vec![]),
        }
    }

    /// Parse the placeholder's backing bytes into a typed value. `captured`
    /// supplies the stream's bytes when attached to stdout/stderr; ignored
    /// for `TempFile` sinks, which read from disk.
    ///
    /// May only be called once: a second call is a protocol error (§8
    /// invariant 4 -- "no placeholder is read more than once").
    pub fn result(
        &mut self,
        registry: &PathRegistry,
        captured: Option<&[u8]>,
    ) -> Result<Value, PlaceholderError> {
        if self.resolved {
            return Err(PlaceholderError::AlreadyConsumed(self.id.lookup_key()));
        }
        let bytes: Vec<u8> = match self.sink {
            OutputSink::TempFile => {
                let path = self
                    .rendered_path
                    .as_ref()
                    .ok_or_else(|| PlaceholderError::NotYetResolved(self.id.lookup_key()))?;
                if registry.is_simulated() {
                    return Err(PlaceholderError::MissingMockData(self.id.lookup_key()));
                }
                std::fs::read(path)?
            }
            OutputSink::Stdout | OutputSink::Stderr => captured
                .ok_or_else(|| PlaceholderError::NotYetResolved(self.id.lookup_key()))?
                .to_vec(),
        };
        self.resolved = true;
        serde_json::from_slice(&bytes)
            .map_err(|e| PlaceholderError::Parse(self.id.lookup_key(), e.to_string()))
    }

    /// Resolve directly from pre-supplied simulation mock data, bypassing
    /// the filesystem entirely (§4.4 simulated step runner).
    pub fn resolve_from_mock(&mut self, value: Value) -> Result<Value, PlaceholderError> {
        if self.resolved {
            return Err(PlaceholderError::AlreadyConsumed(self.id.lookup_key()));
        }
        self.resolved = true;
        Ok(value)
    }

    pub fn cleanup(&self, registry: &mut PathRegistry, _success: bool) {
        if let Some(path) = &self.rendered_path {
            if !registry.is_simulated() {
                let _ = std::fs::remove_file(path);
            }
        }
    }
}

#[cfg(test)]
#[path = "placeholder_tests.rs"]
mod tests;
