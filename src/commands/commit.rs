//! Commit command implementation
//!
//! Runs the whole pipeline:
//! 1. Parse the ledger
//! 2. Resolve every file to its repository and group CRs per repository
//! 3. Label CR groups spanning several repositories
//! 4. Optionally export the plans as JSON
//! 5. Preview (dry-run) or stage and commit every plan

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use patch_commit::compose::CommitComposer;
use patch_commit::defaults::{DEFAULT_LEDGER_FILENAME, DEFAULT_REPOSITORY_MARKER};
use patch_commit::executor::{perform_commits, CommitReport, ExecutionContext};
use patch_commit::git::{GitCli, VcsOperations};
use patch_commit::grouping::{build_project_groups, find_components, CommitPlan, CrInfoTable};
use patch_commit::labeling::assign_ordinals;
use patch_commit::ledger;
use patch_commit::output::OutputConfig;
use patch_commit::path::{absolutize, display_path};
use patch_commit::resolver::RepositoryResolver;

/// Arguments for the commit command
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Root directory of the source tree
    #[arg(long, value_name = "DIR")]
    pub root: PathBuf,

    /// Path to the CR patch ledger
    #[arg(
        long,
        value_name = "FILE",
        env = "PATCH_COMMIT_LEDGER",
        default_value = DEFAULT_LEDGER_FILENAME
    )]
    pub patch_list: PathBuf,

    /// Tag inserted into every commit title as [TAG]
    #[arg(long, value_name = "TAG")]
    pub p_tag: String,

    /// Show the plan and full messages without running git
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Name of the entry that marks a repository root
    #[arg(long, value_name = "NAME", default_value = DEFAULT_REPOSITORY_MARKER)]
    pub marker: String,

    /// Also write the labeled commit plans as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub plan_json: Option<PathBuf>,
}

/// Execute the commit command
pub fn execute(args: CommitArgs, output: &OutputConfig) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&args, output, &GitCli, &mut out)?;
    Ok(())
}

/// One plan as written by `--plan-json`.
#[derive(Serialize)]
struct PlanExport<'a> {
    #[serde(flatten)]
    plan: &'a CommitPlan,
    title: String,
    body: String,
}

fn run(
    args: &CommitArgs,
    output: &OutputConfig,
    vcs: &dyn VcsOperations,
    out: &mut dyn Write,
) -> Result<CommitReport> {
    let root = absolutize(&args.root)?;
    let ledger_path = absolutize(&args.patch_list)?;

    writeln!(out, "Root directory: {}", root.display())?;
    writeln!(out, "Patch list: {}", ledger_path.display())?;
    writeln!(out, "P tag: {}", args.p_tag)?;
    writeln!(out, "Dry run: {}", args.dry_run)?;
    writeln!(out)?;

    let records = ledger::from_file(&ledger_path)?;
    writeln!(out, "Parsed {} CR records from the patch list.", records.len())?;

    let mut resolver = RepositoryResolver::new(&root, &args.marker)?;
    let (project_map, cr_info) = build_project_groups(&records, &mut resolver);
    writeln!(out, "Found {} git projects.", project_map.len())?;

    let mut plans = find_components(&project_map);
    assign_ordinals(&mut plans);
    writeln!(
        out,
        "Built {} commit plans from project and CR overlap.",
        plans.len()
    )?;
    writeln!(out)?;

    let composer = CommitComposer::new(args.p_tag.as_str())?;

    if let Some(plan_json) = &args.plan_json {
        export_plans(plan_json, &plans, &cr_info, &composer)?;
        log::info!("Wrote commit plans to {}", display_path(plan_json));
    }

    let ctx = ExecutionContext {
        root: &root,
        composer: &composer,
        vcs,
        output,
        dry_run: args.dry_run,
    };
    let report = perform_commits(&plans, &cr_info, &ctx, out)?;
    Ok(report)
}

fn export_plans(
    path: &Path,
    plans: &[CommitPlan],
    cr_info: &CrInfoTable,
    composer: &CommitComposer,
) -> Result<()> {
    let exports: Vec<PlanExport<'_>> = plans
        .iter()
        .map(|plan| PlanExport {
            plan,
            title: composer.title(plan, cr_info),
            body: composer.body(plan, cr_info),
        })
        .collect();

    let json = serde_json::to_string_pretty(&exports)?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write plan JSON: {}", path.display()))?;
    Ok(())
}
