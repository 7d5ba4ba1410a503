//! # Patch Commit CLI
//!
//! This is the binary entry point for the `patch-commit` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initializing logging and output styling.
//! - Handling top-level application errors and translating them into a
//!   non-zero exit code.
//!
//! The core application logic is defined in the `lib.rs` library crate, so
//! the binary stays a thin wrapper around the reusable library.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
