use serde::Serialize;

use crate::{error::MatchError, owner::Owner, ruleset::RuleSet};

/// Placeholder owner reported for files no rule assigns an owner to.
pub const UNOWNED: &str = "(unowned)";

/// The resolved owners of a single file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FileOwners {
    pub path: String,
    pub owners: Vec<String>,
}

impl FileOwners {
    pub fn is_unowned(&self) -> bool {
        self.owners.len() == 1 && self.owners[0] == UNOWNED
    }
}

/// Narrows a listing to particular owners and/or unowned files.
#[derive(Debug, Clone, Default)]
pub struct OwnerFilter {
    /// Owner tokens to keep. `@org/team` and `org/team` are both accepted.
    pub owners: Vec<String>,
    pub show_unowned: bool,
}

impl OwnerFilter {
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty() && !self.show_unowned
    }

    fn keeps_unowned(&self) -> bool {
        self.owners.is_empty() || self.show_unowned
    }

    fn keeps(&self, owner: &Owner) -> bool {
        if self.owners.is_empty() {
            return !self.show_unowned;
        }
        let rendered = owner.to_string();
        self.owners
            .iter()
            .any(|filter| *filter == rendered || filter == owner.value())
    }
}

/// Resolve one file against `rules`, returning `None` when the filter drops
/// it.
pub fn file_owners(
    rules: &RuleSet,
    path: &str,
    filter: &OwnerFilter,
) -> Result<Option<FileOwners>, MatchError> {
    let owners = match rules.owners(path)? {
        Some(owners) => owners,
        None if filter.keeps_unowned() => {
            return Ok(Some(FileOwners {
                path: path.to_owned(),
                owners: vec![UNOWNED.to_owned()],
            }))
        }
        None => return Ok(None),
    };

    let kept = owners
        .iter()
        .filter(|owner| filter.keeps(owner))
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    if kept.is_empty() {
        return Ok(None);
    }
    Ok(Some(FileOwners {
        path: path.to_owned(),
        owners: kept,
    }))
}

/// Resolve every file in `files`, in order, dropping those the filter
/// excludes. The first path that cannot be matched aborts the listing.
pub fn list_owners<S: AsRef<str>>(
    rules: &RuleSet,
    files: &[S],
    filter: &OwnerFilter,
) -> Result<Vec<FileOwners>, MatchError> {
    let mut listing = Vec::with_capacity(files.len());
    for file in files {
        if let Some(entry) = file_owners(rules, file.as_ref(), filter)? {
            listing.push(entry);
        }
    }
    Ok(listing)
}
