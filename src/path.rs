//! Path manipulation utilities for patch-commit
//!
//! Ledger paths are plain strings relative to the source root. Everything
//! here works lexically: `.` and `..` are folded without touching the
//! filesystem and symlinks are never resolved, so a file is attributed to
//! the repository its *spelled* path lives in.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Lexically normalize a path, folding `.` and `..` components.
///
/// A `..` at the filesystem root stays at the root. In a relative path a
/// leading `..` that cannot be folded is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Make a path absolute against the current directory and normalize it.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize(path))
    } else {
        Ok(normalize(&env::current_dir()?.join(path)))
    }
}

/// Compute `path` relative to `base`, lexically.
///
/// Both paths must be of the same kind (both absolute or both relative).
/// `..` segments are emitted when `path` is not below `base`. Identical
/// paths yield `.`.
pub fn relative_to(path: &Path, base: &Path) -> Result<PathBuf> {
    if path.is_absolute() != base.is_absolute() {
        return Err(Error::Path {
            message: format!(
                "cannot relate {} to {}: mixed absolute and relative paths",
                path.display(),
                base.display()
            ),
        });
    }

    let path = normalize(path);
    let base = normalize(base);
    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    if base_parts[common..]
        .iter()
        .any(|part| matches!(part, Component::ParentDir))
    {
        return Err(Error::Path {
            message: format!(
                "cannot relate {} to {}: base escapes its origin",
                path.display(),
                base.display()
            ),
        });
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Ok(relative)
}

/// Render a path for messages and commit bodies.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
