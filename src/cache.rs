//! In-process memoization of repository lookups

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Maps an absolute directory to the absolute root of the repository that
/// owns it, or `None` when no repository owns it.
///
/// The cache is built incrementally while files are resolved and is never
/// invalidated: the source tree is assumed not to change during a run.
#[derive(Debug, Clone, Default)]
pub struct RepositoryCache {
    entries: HashMap<PathBuf, Option<PathBuf>>,
}

impl RepositoryCache {
    /// Create a new empty repository cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a directory. The outer `Option` is the cache hit, the inner
    /// one the owning repository.
    pub fn get(&self, dir: &Path) -> Option<Option<&Path>> {
        self.entries.get(dir).map(|owner| owner.as_deref())
    }

    /// Record the owner of a directory
    pub fn insert(&mut self, dir: PathBuf, owner: Option<PathBuf>) {
        self.entries.insert(dir, owner);
    }

    /// Record the same owner for every directory in `dirs`
    pub fn insert_all<I>(&mut self, dirs: I, owner: Option<&Path>)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for dir in dirs {
            self.entries.insert(dir, owner.map(Path::to_path_buf));
        }
    }

    /// Check if a directory has been resolved already
    pub fn contains(&self, dir: &Path) -> bool {
        self.entries.contains_key(dir)
    }

    /// Get the number of cached directories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
