//! # Commit Message Composition
//!
//! Renders the title and body of a [`CommitPlan`]. The same text is shown in
//! the dry-run preview and handed to `git commit`, so everything here is a
//! pure function of the plan, the CR metadata and the tag.
//!
//! ## Title
//!
//! ```text
//! [P27][ALPS1][ALPS2] Summary of the smallest CR id [1/2]
//! ```
//!
//! The summary comes from the lexicographically smallest CR id of the group.
//! Security advisories written as `[Google Security Patch][CVE-...]Text` are
//! shortened to `[Google Security Patch] Text`. The trailing `[i/n]` appears
//! only when the group landed in more than one repository.
//!
//! ## Body
//!
//! One block per CR, in group order:
//!
//! ```text
//! Patch Type:
//!   Customer Request
//! CR ID:
//!   ALPS1
//! Severity:
//!   Critical
//!
//! Description:
//!   first line
//!   second line
//!
//! Associated Files (this project):
//!   core/Foo.java
//! ```
//!
//! File paths are shown relative to the repository root.

use std::borrow::Cow;
use std::path::Path;

use regex::Regex;

use crate::defaults::NO_DESCRIPTION_PLACEHOLDER;
use crate::error::Result;
use crate::grouping::{CommitPlan, CrInfoTable};
use crate::path::{display_path, relative_to};

const SECURITY_PATCH_PREFIX: &str = "[Google Security Patch]";

/// Builds commit titles and bodies for one run.
#[derive(Debug, Clone)]
pub struct CommitComposer {
    tag: String,
    security_advisory: Regex,
}

impl CommitComposer {
    /// Create a composer that prefixes every title with `[tag]`.
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        let security_advisory = Regex::new(&format!(
            r"^{}\s*\[[^\]]+\](.*)",
            regex::escape(SECURITY_PATCH_PREFIX)
        ))?;
        Ok(Self {
            tag: tag.into(),
            security_advisory,
        })
    }

    /// Rewrite a description summary for use in a title.
    pub fn transform_summary<'a>(&self, summary: &'a str) -> Cow<'a, str> {
        match self.security_advisory.captures(summary) {
            Some(captures) => {
                let rest = captures.get(1).map_or("", |m| m.as_str()).trim();
                Cow::Owned(format!("{} {}", SECURITY_PATCH_PREFIX, rest))
            }
            None => Cow::Borrowed(summary),
        }
    }

    /// Render the commit title.
    pub fn title(&self, plan: &CommitPlan, cr_info: &CrInfoTable) -> String {
        let mut title = format!("[{}]", self.tag);
        let Some(first_cr) = plan.group.iter().min() else {
            return title;
        };

        for cr_id in &plan.group {
            title.push_str(&format!("[{}]", cr_id));
        }

        let summary = cr_info
            .get(first_cr)
            .map_or("", |info| info.description_first.as_str());
        let subject = self.transform_summary(summary);
        if !subject.is_empty() {
            title.push(' ');
            title.push_str(&subject);
        }

        if let Some(ordinal) = plan.ordinal.filter(|o| o.total > 1) {
            title.push_str(&format!(" [{}/{}]", ordinal.index, ordinal.total));
        }
        title
    }

    /// Render the commit body. Always ends with exactly one newline.
    pub fn body(&self, plan: &CommitPlan, cr_info: &CrInfoTable) -> String {
        let mut lines: Vec<String> = Vec::new();

        for cr_id in &plan.group {
            let (patch_type, severity, description_first, description_full) =
                match cr_info.get(cr_id) {
                    Some(info) => (
                        info.patch_type.as_str(),
                        info.severity.as_str(),
                        info.description_first.as_str(),
                        info.description_full.as_str(),
                    ),
                    None => ("", "", "", ""),
                };

            lines.push("Patch Type:".to_string());
            lines.push(indent(patch_type));
            lines.push("CR ID:".to_string());
            lines.push(indent(cr_id));
            lines.push("Severity:".to_string());
            lines.push(indent(severity));
            lines.push(String::new());

            lines.push("Description:".to_string());
            if !description_full.is_empty() {
                lines.extend(
                    description_full
                        .lines()
                        .map(|line| indent(line.trim_start())),
                );
            } else if !description_first.is_empty() {
                lines.push(indent(description_first));
            } else {
                lines.push(indent(NO_DESCRIPTION_PLACEHOLDER));
            }
            lines.push(String::new());

            let files = plan.cr_files.get(cr_id).map_or(&[][..], Vec::as_slice);
            if !files.is_empty() {
                lines.push("Associated Files (this project):".to_string());
                let mut rendered: Vec<String> = files
                    .iter()
                    .map(|file| project_relative(file, &plan.project))
                    .collect();
                rendered.sort();
                lines.extend(rendered.iter().map(|file| indent(file)));
            }
            lines.push(String::new());
        }

        let mut body = lines.join("\n").trim_end().to_string();
        body.push('\n');
        body
    }

    /// Render the full message passed to `git commit -F`.
    pub fn message(&self, plan: &CommitPlan, cr_info: &CrInfoTable) -> String {
        format!(
            "{}\n\n{}",
            self.title(plan, cr_info),
            self.body(plan, cr_info)
        )
    }
}

/// Indent a body value by two spaces, blank values included.
fn indent(line: &str) -> String {
    format!("  {}", line)
}

/// A root-relative file path expressed relative to its repository.
fn project_relative(file: &str, project: &str) -> String {
    if project.is_empty() {
        return file.to_string();
    }
    match relative_to(Path::new(file), Path::new(project)) {
        Ok(relative) => display_path(&relative),
        Err(e) => {
            log::debug!("Keeping '{}' as written: {}", file, e);
            file.to_string()
        }
    }
}
