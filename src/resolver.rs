//! # Repository Resolution
//!
//! A large source tree contains many independently versioned repositories.
//! This module maps a ledger file path to the repository that owns it by
//! walking up from the file's directory until a directory carrying the
//! repository marker (`.git` by default) is found.
//!
//! ## Design
//!
//! Marker detection sits behind the [`MarkerProbe`] trait so the resolver
//! can be exercised against a fake tree in tests. [`DiskMarkerProbe`] is the
//! production implementation; it accepts any filesystem entry with the
//! marker name, which also covers worktrees and submodules whose `.git` is a
//! file.
//!
//! Every directory visited during an ascent is memoized in a
//! [`RepositoryCache`] together with the result, so neighbouring files cost
//! a single hash lookup.
//!
//! Repository paths are returned relative to the root. The root repository
//! itself is the empty string, which keeps "root is the repository" distinct
//! from "no repository" (`None`).

use std::path::{Path, PathBuf};

use log::warn;

use crate::cache::RepositoryCache;
use crate::error::Result;
use crate::path::{absolutize, display_path, normalize};

/// Trait for repository marker detection - allows faking the tree in tests
pub trait MarkerProbe {
    /// Returns true if `dir` is the root of a repository.
    fn has_marker(&self, dir: &Path) -> bool;
}

/// The default implementation of `MarkerProbe`, which checks the host
/// filesystem for an entry named `marker` inside the directory.
pub struct DiskMarkerProbe {
    marker: String,
}

impl DiskMarkerProbe {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl MarkerProbe for DiskMarkerProbe {
    fn has_marker(&self, dir: &Path) -> bool {
        dir.join(&self.marker).exists()
    }
}

/// Maps files under a root directory to their owning repository.
pub struct RepositoryResolver {
    root: PathBuf,
    probe: Box<dyn MarkerProbe>,
    cache: RepositoryCache,
}

impl RepositoryResolver {
    /// Creates a resolver over `root` that looks for `marker` on disk.
    ///
    /// `root` is made absolute against the current directory.
    pub fn new(root: &Path, marker: &str) -> Result<Self> {
        Ok(Self::with_probe(
            absolutize(root)?,
            Box::new(DiskMarkerProbe::new(marker)),
        ))
    }

    /// Creates a resolver with a custom `MarkerProbe`.
    ///
    /// `root` must already be absolute.
    pub fn with_probe(root: PathBuf, probe: Box<dyn MarkerProbe>) -> Self {
        Self {
            root: normalize(&root),
            probe,
            cache: RepositoryCache::new(),
        }
    }

    /// The lookup cache built so far.
    pub fn cache(&self) -> &RepositoryCache {
        &self.cache
    }

    /// Resolve a root-relative file path to its owning repository.
    ///
    /// Returns the repository path relative to the root (`""` for the root
    /// repository), or `None` if the file is outside the root or no
    /// repository owns it.
    pub fn resolve(&mut self, file: &str) -> Option<String> {
        let abs_path = normalize(&self.root.join(file));
        if abs_path == self.root || !abs_path.starts_with(&self.root) {
            warn!(
                "File '{}' is not under root '{}', skip.",
                file,
                self.root.display()
            );
            return None;
        }

        let start = abs_path.parent()?.to_path_buf();
        let owner = self.find_owner(start)?;
        owner
            .strip_prefix(&self.root)
            .ok()
            .map(display_path)
    }

    /// Ascend from `start` to the nearest directory carrying the marker,
    /// stopping at the root.
    fn find_owner(&mut self, start: PathBuf) -> Option<PathBuf> {
        let mut visited = Vec::new();
        let mut current = start;

        let owner = loop {
            if let Some(hit) = self.cache.get(&current) {
                break hit.map(Path::to_path_buf);
            }
            visited.push(current.clone());

            if self.probe.has_marker(&current) {
                break Some(current);
            }
            if current == self.root {
                break None;
            }
            match current.parent() {
                Some(parent) if parent != current => current = parent.to_path_buf(),
                _ => break None,
            }
        };

        self.cache.insert_all(visited, owner.as_deref());
        owner
    }
}
