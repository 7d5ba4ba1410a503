//! CLI argument parsing and logging setup

use anyhow::Result;
use clap::Parser;

use patch_commit::output::OutputConfig;

use crate::commands;

/// Patch Commit - Turn a CR patch ledger into per-repository git commits
#[derive(Parser, Debug)]
#[command(name = "patch-commit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    commit: commands::commit::CommitArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // RUST_LOG wins over --log-level when set
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&self.log_level))
            .init();

        let output = OutputConfig::from_env_and_flag(&self.color);
        commands::commit::execute(self.commit, &output)
    }
}
