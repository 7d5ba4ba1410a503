//! # Project Grouping
//!
//! Turns parsed CR records into commit plans.
//!
//! ## Process
//!
//! 1.  **Resolution**: every file of every record is resolved to its owning
//!     repository. Files without one are warned about and left out. The
//!     result is a [`ProjectMap`] (repository → CR → files) plus a
//!     [`CrInfoTable`] holding each CR's metadata once.
//!
//! 2.  **Components**: inside each repository, two CRs are linked when they
//!     touch a common file. A breadth-first walk over that adjacency, started
//!     from CR ids in sorted order, yields the connected components. Each
//!     component becomes one [`CommitPlan`].
//!
//! Repositories are visited in ascending path order (root first) and the
//! components within a repository in ascending order of their smallest CR
//! id, so the same ledger always produces the same plan sequence.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::warn;
use serde::Serialize;

use crate::defaults::repository_label;
use crate::ledger::CrRecord;
use crate::resolver::RepositoryResolver;

/// Repository path → CR id → files of that CR inside the repository.
///
/// The root repository is keyed by the empty string.
pub type ProjectMap = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

/// CR id → metadata, one entry per CR.
pub type CrInfoTable = BTreeMap<String, CrInfo>;

/// The metadata part of a [`CrRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrInfo {
    pub patch_type: String,
    pub severity: String,
    pub description_first: String,
    pub description_full: String,
}

impl From<&CrRecord> for CrInfo {
    fn from(record: &CrRecord) -> Self {
        Self {
            patch_type: record.patch_type.clone(),
            severity: record.severity.clone(),
            description_first: record.description_first.clone(),
            description_full: record.description_full.clone(),
        }
    }
}

/// Position of a plan among the plans that share its CR group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ordinal {
    /// 1-based position, by ascending repository path.
    pub index: usize,
    /// Number of repositories the CR group landed in.
    pub total: usize,
}

/// One commit: a connected group of CRs inside one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitPlan {
    /// Repository path relative to the root, `""` for the root repository.
    pub project: String,
    /// Sorted CR ids of the component.
    pub group: Vec<String>,
    /// Sorted union of the group's files in this repository.
    pub all_files: Vec<String>,
    /// Sorted files of each CR in this repository.
    pub cr_files: BTreeMap<String, Vec<String>>,
    /// Set by [`crate::labeling::assign_ordinals`] when the group spans
    /// more than one repository.
    pub ordinal: Option<Ordinal>,
}

impl CommitPlan {
    /// Printable repository name.
    pub fn project_label(&self) -> &str {
        repository_label(&self.project)
    }
}

/// Resolve every file of every record and collect the per-repository map.
///
/// The first record seen for a CR id provides its metadata; files from all
/// records with that id are merged.
pub fn build_project_groups(
    records: &[CrRecord],
    resolver: &mut RepositoryResolver,
) -> (ProjectMap, CrInfoTable) {
    let mut project_map = ProjectMap::new();
    let mut cr_info = CrInfoTable::new();

    for record in records {
        let info = CrInfo::from(record);
        match cr_info.get(&record.cr_id) {
            None => {
                cr_info.insert(record.cr_id.clone(), info);
            }
            Some(existing) if *existing != info => {
                warn!(
                    "CR {} appears again with different metadata; keeping the first occurrence",
                    record.cr_id
                );
            }
            Some(_) => {}
        }

        for file in &record.files {
            let Some(project) = resolver.resolve(file) else {
                warn!("No git project found for file '{}' (CR {})", file, record.cr_id);
                continue;
            };
            project_map
                .entry(project)
                .or_default()
                .entry(record.cr_id.clone())
                .or_default()
                .insert(file.clone());
        }
    }

    (project_map, cr_info)
}

/// Partition every repository's CRs into connected components.
pub fn find_components(project_map: &ProjectMap) -> Vec<CommitPlan> {
    project_map
        .iter()
        .flat_map(|(project, cr_files)| components_for_project(project, cr_files))
        .collect()
}

/// Connected components of one repository, in sorted order.
fn components_for_project(
    project: &str,
    cr_files: &BTreeMap<String, BTreeSet<String>>,
) -> Vec<CommitPlan> {
    // file -> CRs touching it
    let mut file_to_crs: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (cr_id, files) in cr_files {
        for file in files {
            file_to_crs
                .entry(file.as_str())
                .or_default()
                .push(cr_id.as_str());
        }
    }

    let mut adjacency: BTreeMap<&str, BTreeSet<&str>> = cr_files
        .keys()
        .map(|cr_id| (cr_id.as_str(), BTreeSet::new()))
        .collect();
    for crs in file_to_crs.values().filter(|crs| crs.len() > 1) {
        for (i, &a) in crs.iter().enumerate() {
            for &b in &crs[i + 1..] {
                adjacency.entry(a).or_default().insert(b);
                adjacency.entry(b).or_default().insert(a);
            }
        }
    }

    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut plans = Vec::new();

    for start in cr_files.keys() {
        if !visited.insert(start.as_str()) {
            continue;
        }

        let mut component = Vec::new();
        let mut queue = VecDeque::from([start.as_str()]);
        while let Some(node) = queue.pop_front() {
            component.push(node);
            for &neighbour in adjacency.get(node).into_iter().flatten() {
                if visited.insert(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }
        component.sort_unstable();

        let mut all_files = BTreeSet::new();
        let mut member_files = BTreeMap::new();
        for &cr_id in &component {
            let files: Vec<String> = cr_files
                .get(cr_id)
                .map(|files| files.iter().cloned().collect())
                .unwrap_or_default();
            all_files.extend(files.iter().cloned());
            member_files.insert(cr_id.to_string(), files);
        }

        plans.push(CommitPlan {
            project: project.to_string(),
            group: component.iter().map(|id| id.to_string()).collect(),
            all_files: all_files.into_iter().collect(),
            cr_files: member_files,
            ordinal: None,
        });
    }

    plans
}
