use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Args;
use co_rs::{FileOwners, OwnerFilter};

use super::{owners_row, stats, Session};
use crate::files;

/// List code owners for files
///
/// Unowned files are reported as belonging to the "(unowned)" group.
#[derive(Debug, Args)]
pub struct WhoArgs {
    /// Files or directories to check (default: every file tracked at HEAD)
    pub paths: Vec<PathBuf>,

    /// Only show files owned by these owners
    #[arg(short, long = "owner", value_delimiter = ',')]
    pub owners: Vec<String>,

    /// Only show unowned files (can be combined with --owner)
    #[arg(short, long)]
    pub unowned: bool,

    /// Print JSON: an array of {path, owners}
    #[arg(short, long)]
    pub json: bool,

    /// Print ownership statistics instead of the listing
    #[arg(long)]
    pub stats: bool,
}

impl WhoArgs {
    pub fn filter(&self) -> OwnerFilter {
        OwnerFilter {
            owners: self.owners.clone(),
            show_unowned: self.unowned,
        }
    }
}

pub fn run(session: &Session, args: &WhoArgs) -> Result<ExitCode> {
    let listing = owned_files(session, &args.paths, &args.filter())?;

    if args.stats {
        stats::print(&listing, false)?;
        return Ok(ExitCode::SUCCESS);
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(ExitCode::SUCCESS);
    }
    for entry in &listing {
        println!("{}", owners_row(entry));
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolve the given paths, or every file tracked at `HEAD` when none are
/// given.
pub(crate) fn owned_files(
    session: &Session,
    paths: &[PathBuf],
    filter: &OwnerFilter,
) -> Result<Vec<FileOwners>> {
    let rules = session.load_rules()?;
    let files = if paths.is_empty() {
        session.git.ls_files(Some("HEAD"))?
    } else {
        files::expand_paths(paths)
    };
    Ok(files::resolve(&rules, &files, filter)?)
}
