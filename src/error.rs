//! # Error Handling
//!
//! This module defines the centralized error type for the `patch-commit`
//! library. It uses `thiserror` to describe every failure that can escape a
//! library call, with enough context to print a useful message.
//!
//! Most problems the pipeline meets are *not* errors in this sense: blocks
//! without a CR ID, files outside the root, missing files at stage time and
//! failed commits are all reported and skipped where they happen. Only the
//! conditions below are surfaced as `Err` values:
//!
//! - The ledger file does not exist (fatal, before any parsing).
//! - A `git` invocation could not be started or exited unexpectedly.
//! - A path could not be expressed relative to another.
//! - I/O, regex and JSON failures wrapped from their source crates.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for patch-commit operations
#[derive(Error, Debug)]
pub enum Error {
    /// The ledger file passed on the command line does not exist.
    #[error("Ledger file not found: {}", path.display())]
    LedgerNotFound { path: PathBuf },

    /// A `git` command failed to start or reported a failure.
    #[error("Git command failed in {}: git {command} - {stderr}", cwd.display())]
    GitCommand {
        command: String,
        cwd: PathBuf,
        stderr: String,
    },

    /// An error occurred with a path-related operation.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
