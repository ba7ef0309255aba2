use std::{cmp::Ordering, collections::HashMap};

use serde::Serialize;

use crate::list::{FileOwners, UNOWNED};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesPerOwner {
    pub owner: String,
    #[serde(rename = "fileCount")]
    pub count: usize,
    /// Share of all listed files, from 0 to 100.
    pub percentage: f64,
}

/// Aggregate ownership figures over a listing produced by
/// [`list_owners`](crate::list::list_owners).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipStats {
    pub total_files: usize,
    pub owned_files: usize,
    pub unowned_files: usize,
    /// Distinct owners, not counting the unowned placeholder.
    pub total_owners: usize,
    /// Most files first. Ties are ordered by owner, with the unowned
    /// placeholder after real owners.
    pub files_per_owner: Vec<FilesPerOwner>,
}

impl OwnershipStats {
    pub fn calculate(files: &[FileOwners]) -> OwnershipStats {
        let total_files = files.len();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for file in files {
            for owner in &file.owners {
                *counts.entry(owner.as_str()).or_default() += 1;
            }
        }

        let unowned_files = counts.get(UNOWNED).copied().unwrap_or(0);
        let total_owners = counts.keys().filter(|owner| **owner != UNOWNED).count();

        let mut files_per_owner = counts
            .into_iter()
            .map(|(owner, count)| FilesPerOwner {
                owner: owner.to_owned(),
                count,
                percentage: count as f64 / total_files as f64 * 100.0,
            })
            .collect::<Vec<_>>();
        files_per_owner.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| unowned_last(&a.owner, &b.owner))
                .then_with(|| a.owner.cmp(&b.owner))
        });

        OwnershipStats {
            total_files,
            owned_files: total_files - unowned_files,
            unowned_files,
            total_owners,
            files_per_owner,
        }
    }
}

fn unowned_last(a: &str, b: &str) -> Ordering {
    (a == UNOWNED).cmp(&(b == UNOWNED))
}
