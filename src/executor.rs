//! # Commit Execution
//!
//! Prints the commit plan and then either previews every message (dry-run)
//! or stages and commits each plan through a [`VcsOperations`]
//! implementation.
//!
//! Failures are contained at the smallest granularity: a file that cannot
//! be staged is skipped, a plan that cannot be committed is reported, and
//! processing always continues with the next plan. The returned
//! [`CommitReport`] counts what happened.

use std::io::Write;
use std::path::Path;

use log::debug;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::compose::CommitComposer;
use crate::error::Result;
use crate::git::VcsOperations;
use crate::grouping::{CommitPlan, CrInfoTable};
use crate::output::{OutputConfig, Status};
use crate::path::{display_path, normalize, relative_to};

/// Everything the executor needs besides the plans themselves.
pub struct ExecutionContext<'a> {
    /// Absolute root of the source tree.
    pub root: &'a Path,
    pub composer: &'a CommitComposer,
    pub vcs: &'a dyn VcsOperations,
    pub output: &'a OutputConfig,
    pub dry_run: bool,
}

/// Outcome counters of a run. A dry-run leaves every counter at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    pub committed: usize,
    pub skipped_unchanged: usize,
    pub skipped_missing_dir: usize,
    pub failed: usize,
    pub files_missing: usize,
    pub files_failed: usize,
}

impl CommitReport {
    /// One-line summary printed after a live run.
    pub fn summary(&self) -> String {
        format!(
            "{} committed, {} unchanged, {} missing directories, {} failed ({} files missing, {} files failed to stage)",
            self.committed,
            self.skipped_unchanged,
            self.skipped_missing_dir,
            self.failed,
            self.files_missing,
            self.files_failed
        )
    }
}

/// Print the plan and run (or preview) every commit.
///
/// Only writes to `out` can fail this function; version-control failures
/// are reported in the output and counted in the report.
pub fn perform_commits(
    plans: &[CommitPlan],
    cr_info: &CrInfoTable,
    ctx: &ExecutionContext<'_>,
    out: &mut dyn Write,
) -> Result<CommitReport> {
    print_plan(plans, cr_info, ctx.composer, out)?;

    if ctx.dry_run {
        print_preview(plans, cr_info, ctx.composer, out)?;
        return Ok(CommitReport::default());
    }

    writeln!(out)?;
    writeln!(out, "Running git add / git commit ...")?;
    writeln!(out)?;

    let mut report = CommitReport::default();
    for (idx, plan) in plans.iter().enumerate() {
        commit_plan(idx + 1, plan, cr_info, ctx, out, &mut report)?;
    }

    writeln!(out)?;
    writeln!(out, "Done: {}", report.summary())?;
    Ok(report)
}

fn print_plan(
    plans: &[CommitPlan],
    cr_info: &CrInfoTable,
    composer: &CommitComposer,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "========== Commit Plan ==========")?;
    for (idx, plan) in plans.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "[{}] Project: {}", idx + 1, plan.project_label())?;
        writeln!(out, "    CRs: {}", plan.group.join(", "))?;
        if let Some(ordinal) = plan.ordinal.filter(|o| o.total > 1) {
            writeln!(out, "    Repo index: {}/{}", ordinal.index, ordinal.total)?;
        }
        writeln!(out, "    Title: {}", composer.title(plan, cr_info))?;
        writeln!(out, "    Files:")?;
        for file in &plan.all_files {
            writeln!(out, "      - {}", file)?;
        }
    }
    Ok(())
}

fn print_preview(
    plans: &[CommitPlan],
    cr_info: &CrInfoTable,
    composer: &CommitComposer,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "(dry-run) No git add / git commit will be run.")?;
    writeln!(out)?;
    writeln!(out, "Full message preview for each commit:")?;
    writeln!(out)?;

    for (idx, plan) in plans.iter().enumerate() {
        writeln!(
            out,
            "--- Commit #{} - Project: {} ---",
            idx + 1,
            plan.project_label()
        )?;
        writeln!(out, "{}", composer.message(plan, cr_info))?;
        writeln!(out, "{}", "-".repeat(60))?;
    }
    Ok(())
}

fn commit_plan(
    idx: usize,
    plan: &CommitPlan,
    cr_info: &CrInfoTable,
    ctx: &ExecutionContext<'_>,
    out: &mut dyn Write,
    report: &mut CommitReport,
) -> Result<()> {
    let marker = |status| ctx.output.marker(status);
    let repo_dir = normalize(&ctx.root.join(&plan.project));

    if !repo_dir.is_dir() {
        writeln!(
            out,
            "{} Project dir not found, skip: {}",
            marker(Status::Warn),
            repo_dir.display()
        )?;
        report.skipped_missing_dir += 1;
        return Ok(());
    }

    writeln!(out, "[{}] Project: {}", idx, plan.project_label())?;
    writeln!(out, "    Commit title: {}", ctx.composer.title(plan, cr_info))?;

    for file in &plan.all_files {
        let abs_path = normalize(&ctx.root.join(file));
        if !abs_path.exists() {
            writeln!(
                out,
                "    {} File not found, skip add: {}",
                marker(Status::Warn),
                file
            )?;
            report.files_missing += 1;
            continue;
        }

        let staged = relative_to(&abs_path, &repo_dir)
            .and_then(|relative| ctx.vcs.stage(&repo_dir, &relative).map(|_| relative));
        match staged {
            Ok(relative) => debug!("Staged {} in {}", display_path(&relative), repo_dir.display()),
            Err(e) => {
                writeln!(
                    out,
                    "    {} git add failed for {}: {}",
                    marker(Status::Error),
                    file,
                    e
                )?;
                report.files_failed += 1;
            }
        }
    }

    match ctx.vcs.has_staged_changes(&repo_dir) {
        Ok(true) => {}
        Ok(false) => {
            writeln!(
                out,
                "    {} No staged changes, skip commit.",
                marker(Status::Info)
            )?;
            report.skipped_unchanged += 1;
            return Ok(());
        }
        Err(e) => {
            writeln!(
                out,
                "    {} Could not inspect staged changes in {}: {}",
                marker(Status::Error),
                repo_dir.display(),
                e
            )?;
            report.failed += 1;
            return Ok(());
        }
    }

    let message = ctx.composer.message(plan, cr_info);
    match commit_with_message(ctx.vcs, &repo_dir, &message) {
        Ok(()) => {
            writeln!(out, "    {} Commit created.", marker(Status::Ok))?;
            report.committed += 1;
        }
        Err(e) => {
            writeln!(
                out,
                "    {} git commit failed in {}: {}",
                marker(Status::Error),
                repo_dir.display(),
                e
            )?;
            report.failed += 1;
        }
    }
    Ok(())
}

/// Write `message` to a temporary file and commit with it.
///
/// The file is removed when this function returns, whatever the outcome.
fn commit_with_message(vcs: &dyn VcsOperations, repo_dir: &Path, message: &str) -> Result<()> {
    let mut message_file = NamedTempFile::new()?;
    message_file.write_all(message.as_bytes())?;
    message_file.flush()?;

    vcs.commit_with_message_file(repo_dir, message_file.path())
}
