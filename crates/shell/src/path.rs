// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path registry (§4.1): names abstract roots and resolves them to absolute
//! filesystem paths, or to entries in a mocked virtual filesystem during
//! simulation.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("unknown root `{0}`")]
    UnknownRoot(String),
    #[error("checkout_dir read before it was set (deprecated slot, see design note §4.1)")]
    CheckoutDirUnset,
    #[error("io error resolving `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One real-or-virtual root the registry knows how to resolve.
#[derive(Debug, Clone)]
enum Root {
    Real(PathBuf),
    /// Backed by the virtual filesystem in simulation mode.
    Virtual(PathBuf),
}

impl Root {
    fn path(&self) -> &Path {
        match self {
            Root::Real(p) | Root::Virtual(p) => p,
        }
    }
}

/// Abstract root + path construction, mockable for the simulation harness.
///
/// In real mode, `exists`/`listdir`/`mkdtemp`/`mkstemp` touch the actual
/// filesystem. In simulation mode, the registry is backed entirely by an
/// in-memory set of "present" paths that the test configures (mirroring
/// `api.path.exists(p)` marking a path as present in the source system).
pub struct PathRegistry {
    roots: HashMap<String, Root>,
    simulated: bool,
    present: BTreeSet<PathBuf>,
    cleanup: Vec<PathBuf>,
    /// Deprecated settable-once slot (§4.1 design rationale). `None` until
    /// first write; reading before writing is an error.
    checkout_dir: Option<PathBuf>,
    temp_counter: std::sync::atomic::AtomicU64,
}

impl PathRegistry {
    /// Construct a registry backed by the real filesystem.
    pub fn real(start_dir: impl Into<PathBuf>) -> Self {
        let mut roots = HashMap::new();
        let start_dir = start_dir.into();
        roots.insert("start_dir".into(), Root::Real(start_dir.clone()));
        roots.insert(
            "cache".into(),
            Root::Real(dirs::cache_dir().unwrap_or_else(|| start_dir.join(".cache"))),
        );
        roots.insert("cleanup".into(), Root::Real(start_dir.join(".cleanup")));
        roots.insert("tmp_base".into(), Root::Real(std::env::temp_dir()));
        Self {
            roots,
            simulated: false,
            present: BTreeSet::new(),
            cleanup: Vec::new(),
            checkout_dir: None,
            temp_counter: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Construct a registry backed by a mocked virtual filesystem, for the
    /// simulation harness (§4.9).
    pub fn simulated() -> Self {
        let mut roots = HashMap::new();
        roots.insert("start_dir".into(), Root::Virtual("/start".into()));
        roots.insert("cache".into(), Root::Virtual("/cache".into()));
        roots.insert("cleanup".into(), Root::Virtual("/cleanup".into()));
        roots.insert("tmp_base".into(), Root::Virtual("/tmp".into()));
        Self {
            roots,
            simulated: true,
            present: BTreeSet::new(),
            cleanup: Vec::new(),
            checkout_dir: None,
            temp_counter: std::sync::atomic::AtomicU64::new(0),
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    /// Register a named root (e.g. a per-module `resource_dir(module)`).
    pub fn register_root(&mut self, name: impl Into<String>, initial_path: impl Into<PathBuf>) {
        let path = initial_path.into();
        let root = if self.simulated {
            Root::Virtual(path)
        } else {
            Root::Real(path)
        };
        self.roots.insert(name.into(), root);
    }

    /// Pure construction: join segments onto a named root. Never touches
    /// the filesystem.
    pub fn join(&self, root: &str, segments: &[&str]) -> Result<PathBuf, PathError> {
        let base = self
            .roots
            .get(root)
            .ok_or_else(|| PathError::UnknownRoot(root.to_string()))?
            .path();
        let mut p = base.to_path_buf();
        for seg in segments {
            p.push(seg);
        }
        Ok(p)
    }

    /// Mark a path as present, for simulation-mode tests configuring
    /// `api.path.exists(p)`.
    pub fn mark_present(&mut self, path: impl Into<PathBuf>) {
        self.present.insert(path.into());
    }

    pub fn exists(&self, path: &Path) -> Result<bool, PathError> {
        if self.simulated {
            Ok(self.present.contains(path))
        } else {
            Ok(path.try_exists().map_err(|e| PathError::Io {
                path: path.to_path_buf(),
                source: e,
            })?)
        }
    }

    pub fn listdir(&self, path: &Path) -> Result<Vec<PathBuf>, PathError> {
        if self.simulated {
            Ok(self
                .present
                .iter()
                .filter(|p| p.parent() == Some(path))
                .cloned()
                .collect())
        } else {
            std::fs::read_dir(path)
                .map_err(|e| PathError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })?
                .map(|entry| {
                    entry
                        .map(|e| e.path())
                        .map_err(|e| PathError::Io {
                            path: path.to_path_buf(),
                            source: e,
                        })
                })
                .collect()
        }
    }

    fn fresh_name(&self, prefix: &str) -> String {
        let n = self
            .temp_counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("{prefix}-{n}")
    }

    /// A fresh directory under `root`, marked for cleanup at recipe end.
    pub fn mkdtemp(&mut self, root: &str) -> Result<PathBuf, PathError> {
        let name = self.fresh_name("tmpdir");
        let path = self.join(root, &[&name])?;
        if self.simulated {
            self.present.insert(path.clone());
        } else {
            std::fs::create_dir_all(&path).map_err(|e| PathError::Io {
                path: path.clone(),
                source: e,
            })?;
        }
        self.cleanup.push(path.clone());
        Ok(path)
    }

    /// A fresh file path under `root` (not created), marked for cleanup.
    pub fn mkstemp(&mut self, root: &str) -> Result<PathBuf, PathError> {
        let name = self.fresh_name("tmpfile");
        let path = self.join(root, &[&name])?;
        self.cleanup.push(path.clone());
        Ok(path)
    }

    /// Paths allocated via `mkdtemp`/`mkstemp` during this invocation, owed
    /// cleanup at recipe end regardless of outcome (§5, §8 invariant 3).
    pub fn pending_cleanup(&self) -> &[PathBuf] {
        &self.cleanup
    }

    /// Delete every path allocated during this invocation. Idempotent and
    /// best-effort: a path that is already gone is not an error.
    pub fn cleanup_all(&mut self) {
        for path in self.cleanup.drain(..) {
            if self.simulated {
                self.present.remove(&path);
                continue;
            }
            let _ = if path.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
        }
    }

    /// Read the deprecated `checkout_dir` slot. Errors if never set.
    pub fn checkout_dir(&self) -> Result<&Path, PathError> {
        self.checkout_dir
            .as_deref()
            .ok_or(PathError::CheckoutDirUnset)
    }

    /// Set the deprecated `checkout_dir` slot. Callers should emit a
    /// deprecation warning through the module's warning mechanism; the
    /// registry itself only enforces the settable-once-before-read rule.
    pub fn set_checkout_dir(&mut self, path: impl Into<PathBuf>) {
        self.checkout_dir = Some(path.into());
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
