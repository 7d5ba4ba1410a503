//! # Patch Commit Library
//!
//! This library turns a CR (change request) patch ledger into atomic commits
//! across the many repositories of a large source tree. It is designed to be
//! used by the `patch-commit` command-line tool but can also be embedded in
//! other release-engineering tooling.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::{Path, PathBuf};
//! use patch_commit::compose::CommitComposer;
//! use patch_commit::grouping::{build_project_groups, find_components};
//! use patch_commit::labeling::assign_ordinals;
//! use patch_commit::ledger;
//! use patch_commit::resolver::{MarkerProbe, RepositoryResolver};
//!
//! // Every directory named "repo" is a repository in this fake tree
//! struct Fake;
//! impl MarkerProbe for Fake {
//!     fn has_marker(&self, dir: &Path) -> bool {
//!         dir.ends_with("repo")
//!     }
//! }
//!
//! let text = "Patch Type:\nCustomer Request\nCR ID: ALPS1\nSeverity:\nMajor\n\
//!             Description:\nFix crash\nAssociated Files:\nrepo/a.c\n";
//! let records = ledger::parse(text);
//!
//! let mut resolver = RepositoryResolver::with_probe(PathBuf::from("/src"), Box::new(Fake));
//! let (project_map, cr_info) = build_project_groups(&records, &mut resolver);
//! let mut plans = find_components(&project_map);
//! assign_ordinals(&mut plans);
//!
//! let composer = CommitComposer::new("P27").unwrap();
//! assert_eq!(composer.title(&plans[0], &cr_info), "[P27][ALPS1] Fix crash");
//! ```
//!
//! ## Pipeline
//!
//! 1.  **Ledger (`ledger`)**: parse the ledger text into [`ledger::CrRecord`]s.
//! 2.  **Resolution (`resolver`, `cache`)**: map every file to the repository
//!     owning it by walking up the directory tree, memoizing each directory.
//! 3.  **Grouping (`grouping`)**: per repository, join CRs that touch a common
//!     file into connected components, one [`grouping::CommitPlan`] each.
//! 4.  **Labeling (`labeling`)**: give `[i/n]` ordinals to CR groups that
//!     landed in several repositories.
//! 5.  **Composition (`compose`)**: render commit titles and bodies.
//! 6.  **Execution (`executor`, `git`)**: preview the messages or stage and
//!     commit every plan through `git`.
//!
//! Every stage is deterministic: the same ledger and tree always yield the
//! same plans in the same order with the same messages.

pub mod cache;
pub mod compose;
pub mod defaults;
pub mod error;
pub mod executor;
pub mod git;
pub mod grouping;
pub mod labeling;
pub mod ledger;
pub mod output;
pub mod path;
pub mod resolver;

#[cfg(test)]
mod ledger_proptest;
