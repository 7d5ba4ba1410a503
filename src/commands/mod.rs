//! # CLI Command Implementations
//!
//! `patch-commit` is a single command, kept in its own module the same way
//! a subcommand would be:
//! - An `Args` struct that defines the command's arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and drives the
//!   `patch_commit` library.

pub mod commit;
