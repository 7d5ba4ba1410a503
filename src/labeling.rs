//! Cross-repository ordinals for CR groups
//!
//! The same CR group often lands in several repositories (a framework change
//! plus its vendor counterpart). Each of those commits gets an `[i/n]`
//! marker so reviewers can find the siblings. Plans sharing an identical
//! sorted CR list are ranked by repository path; the root repository's empty
//! path sorts first. Groups that land in a single repository keep
//! `ordinal == None`.

use std::collections::BTreeMap;

use crate::grouping::{CommitPlan, Ordinal};

/// Assign ordinals in place. The order of `plans` is left untouched.
pub fn assign_ordinals(plans: &mut [CommitPlan]) {
    let mut by_group: BTreeMap<Vec<String>, Vec<usize>> = BTreeMap::new();
    for (idx, plan) in plans.iter().enumerate() {
        by_group.entry(plan.group.clone()).or_default().push(idx);
    }

    for indices in by_group.values_mut() {
        if indices.len() < 2 {
            for &idx in indices.iter() {
                plans[idx].ordinal = None;
            }
            continue;
        }

        indices.sort_by(|&a, &b| plans[a].project.cmp(&plans[b].project));
        let total = indices.len();
        for (position, &idx) in indices.iter().enumerate() {
            plans[idx].ordinal = Some(Ordinal {
                index: position + 1,
                total,
            });
        }
    }
}
