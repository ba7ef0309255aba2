use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Args;
use co_rs::{FileOwners, OwnerFilter, OwnershipStats};

use super::{who, Session};

/// Show code ownership statistics for files
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Files or directories to check (default: every file tracked at HEAD)
    pub paths: Vec<PathBuf>,

    /// Print the per-owner counts as JSON
    #[arg(short, long)]
    pub json: bool,
}

pub fn run(session: &Session, args: &StatsArgs) -> Result<ExitCode> {
    let listing = who::owned_files(session, &args.paths, &OwnerFilter::default())?;
    print(&listing, args.json)?;
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn print(listing: &[FileOwners], json: bool) -> Result<()> {
    let stats = OwnershipStats::calculate(listing);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats.files_per_owner)?);
    } else {
        print!("{}", summary(&stats));
    }
    Ok(())
}

fn summary(stats: &OwnershipStats) -> String {
    let percent = |count: usize| {
        if stats.total_files == 0 {
            0.0
        } else {
            count as f64 / stats.total_files as f64 * 100.0
        }
    };

    let mut out = String::new();
    out.push_str(&format!(
        "Total files: {} ({:.2}%)\n",
        stats.total_files,
        percent(stats.total_files)
    ));
    out.push_str(&format!(
        "Total files with owners: {} ({:.2}%)\n",
        stats.owned_files,
        percent(stats.owned_files)
    ));
    out.push_str(&format!(
        "Total unowned files: {} ({:.2}%)\n",
        stats.unowned_files,
        percent(stats.unowned_files)
    ));
    out.push_str(&format!("Total owners: {}\n\n", stats.total_owners));
    for entry in &stats.files_per_owner {
        out.push_str(&format!(
            "{}: {} ({:.2}%)\n",
            entry.owner, entry.count, entry.percentage
        ));
    }
    out
}
