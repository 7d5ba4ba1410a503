//! # Version-Control Collaborator
//!
//! The executor needs three things from version control: stage a path,
//! ask whether anything is staged, and commit with a message read from a
//! file. [`VcsOperations`] describes exactly that so the executor can be
//! tested with a mock. [`GitCli`] is the production implementation, which
//! shells out to the system `git` with the repository as working directory,
//! picking up the user's identity, hooks and configuration as-is.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use log::debug;

use crate::error::{Error, Result};

/// Trait for version-control operations - allows mocking in tests
pub trait VcsOperations {
    /// Stage `path` (relative to `repo_dir`).
    fn stage(&self, repo_dir: &Path, path: &Path) -> Result<()>;

    /// Returns true if the index of `repo_dir` differs from `HEAD`.
    fn has_staged_changes(&self, repo_dir: &Path) -> Result<bool>;

    /// Commit the staged changes using the message stored in `message_file`.
    fn commit_with_message_file(&self, repo_dir: &Path, message_file: &Path) -> Result<()>;
}

/// The default implementation of `VcsOperations`, which uses the system's
/// `git` command.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCli;

impl GitCli {
    fn run(&self, repo_dir: &Path, args: &[&OsStr]) -> Result<Output> {
        let command = render(args);
        debug!("git {} (cwd={})", command, repo_dir.display());

        Command::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .map_err(|e| Error::GitCommand {
                command,
                cwd: repo_dir.to_path_buf(),
                stderr: e.to_string(),
            })
    }

    fn run_checked(&self, repo_dir: &Path, args: &[&OsStr]) -> Result<()> {
        let output = self.run(repo_dir, args)?;
        if output.status.success() {
            return Ok(());
        }
        Err(Error::GitCommand {
            command: render(args),
            cwd: repo_dir.to_path_buf(),
            stderr: failure_text(&output),
        })
    }
}

fn render(args: &[&OsStr]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Best available description of a failed command.
fn failure_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    format!("exited with {}", output.status)
}

impl VcsOperations for GitCli {
    fn stage(&self, repo_dir: &Path, path: &Path) -> Result<()> {
        self.run_checked(repo_dir, &[OsStr::new("add"), OsStr::new("--"), path.as_os_str()])
    }

    fn has_staged_changes(&self, repo_dir: &Path) -> Result<bool> {
        let args = [OsStr::new("diff"), OsStr::new("--cached"), OsStr::new("--quiet")];
        let output = self.run(repo_dir, &args)?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(Error::GitCommand {
                command: render(&args),
                cwd: repo_dir.to_path_buf(),
                stderr: failure_text(&output),
            }),
        }
    }

    fn commit_with_message_file(&self, repo_dir: &Path, message_file: &Path) -> Result<()> {
        self.run_checked(
            repo_dir,
            &[OsStr::new("commit"), OsStr::new("-F"), message_file.as_os_str()],
        )
    }
}
