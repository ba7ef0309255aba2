use std::path::{Path, PathBuf};

use co_rs::{FileOwners, MatchError, OwnerFilter, RuleSet};
use walkdir::WalkDir;

/// Expand the given paths into a list of files. Directories are walked
/// recursively, skipping `.git`; anything else is taken as given.
pub fn expand_paths(paths: &[PathBuf]) -> Vec<String> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(normalize(path));
            continue;
        }
        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git")
            .filter_map(|entry| entry.ok())
            .filter(|entry| !entry.file_type().is_dir());
        files.extend(walker.map(|entry| normalize(entry.path())));
    }
    files
}

fn normalize(path: &Path) -> String {
    let path = path.strip_prefix(".").unwrap_or(path);
    path.to_string_lossy().into_owned()
}

/// Resolve the owners of each file, keeping input order.
#[cfg(feature = "rayon")]
pub fn resolve(
    rules: &RuleSet,
    files: &[String],
    filter: &OwnerFilter,
) -> Result<Vec<FileOwners>, MatchError> {
    use rayon::prelude::*;

    let resolved = files
        .par_iter()
        .map(|file| co_rs::list::file_owners(rules, file, filter))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(resolved.into_iter().flatten().collect())
}

#[cfg(not(feature = "rayon"))]
pub fn resolve(
    rules: &RuleSet,
    files: &[String],
    filter: &OwnerFilter,
) -> Result<Vec<FileOwners>, MatchError> {
    co_rs::list_owners(rules, files, filter)
}
