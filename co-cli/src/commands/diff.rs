use std::{collections::BTreeMap, process::ExitCode};

use anyhow::{bail, Result};
use clap::Args;
use co_rs::{FileOwners, OwnerFilter};
use tracing::debug;

use super::{owners_row, Session};
use crate::files;

/// Show how file ownership changed between two revisions
///
/// With a single ref, or none, the index and the CODEOWNERS file on disk are
/// compared against that ref (default HEAD).
#[derive(Debug, Args)]
pub struct DiffArgs {
    /// REF, REF..REF or REF REF
    #[arg(num_args = 0..=2)]
    pub refs: Vec<String>,

    /// Report renamed files under their latest name on both sides
    #[arg(short, long)]
    pub renames: bool,
}

/// The two sides of a comparison. `to == None` means the working copy.
#[derive(Debug, PartialEq, Eq)]
pub struct Range {
    pub from: String,
    pub to: Option<String>,
}

impl Range {
    pub fn parse(refs: &[String]) -> Result<Range> {
        let (from, to) = match refs {
            [] => (None, None),
            [single] => match single.split_once("..") {
                Some((_, to)) if to.starts_with('.') => bail!("bad ref: {}", single),
                Some((from, to)) => (non_empty(from), non_empty(to)),
                None => (non_empty(single), None),
            },
            [from, to] => (non_empty(from), non_empty(to)),
            _ => bail!("expected at most two refs, got {}", refs.len()),
        };
        Ok(Range {
            from: from.unwrap_or_else(|| "HEAD".to_owned()),
            to,
        })
    }

    fn to_label(&self) -> &str {
        self.to.as_deref().unwrap_or("index")
    }
}

fn non_empty(reference: &str) -> Option<String> {
    Some(reference.to_owned()).filter(|reference| !reference.is_empty())
}

pub fn run(session: &Session, args: &DiffArgs) -> Result<ExitCode> {
    let range = Range::parse(&args.refs)?;
    for reference in std::iter::once(&range.from).chain(&range.to) {
        if !session.git.is_valid_ref(reference) {
            bail!("bad ref: {}", reference);
        }
    }
    debug!(from = %range.from, to = range.to_label(), "comparing ownership");

    let mut before = listing(session, Some(&range.from))?;
    let after = listing(session, range.to.as_deref())?;

    if args.renames {
        let follower = session.git.renames(&range.from, range.to.as_deref())?;
        for entry in &mut before {
            entry.path = follower.latest_name(&entry.path).to_owned();
        }
    }

    let changes = diff_listings(&before, &after);
    if changes.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    println!("--- {}", range.from);
    println!("+++ {}", range.to_label());
    for line in &changes {
        println!("{}", line);
    }
    Ok(ExitCode::FAILURE)
}

/// Ownership of every tracked file at `reference`, or in the index with the
/// on-disk rules when `reference` is `None`.
fn listing(session: &Session, reference: Option<&str>) -> Result<Vec<FileOwners>> {
    let rules = match reference {
        Some(reference) => session.load_rules_at(reference)?,
        None => session.load_rules()?,
    };
    let tracked = session.git.ls_files(reference)?;
    Ok(files::resolve(&rules, &tracked, &OwnerFilter::default())?)
}

/// `-` and `+` rows for every path whose owners differ, ordered by path.
/// Paths present on one side only are reported on that side.
pub(crate) fn diff_listings(before: &[FileOwners], after: &[FileOwners]) -> Vec<String> {
    let before = by_path(before);
    let after = by_path(after);

    let mut paths = before.keys().chain(after.keys()).copied().collect::<Vec<_>>();
    paths.sort_unstable();
    paths.dedup();

    let mut lines = Vec::new();
    for path in paths {
        let (old, new) = (before.get(path), after.get(path));
        if old.map(|e| &e.owners) == new.map(|e| &e.owners) {
            continue;
        }
        if let Some(old) = old {
            lines.push(format!("-{}", owners_row(old)));
        }
        if let Some(new) = new {
            lines.push(format!("+{}", owners_row(new)));
        }
    }
    lines
}

fn by_path(listing: &[FileOwners]) -> BTreeMap<&str, &FileOwners> {
    listing
        .iter()
        .map(|entry| (entry.path.as_str(), entry))
        .collect()
}
