use std::{fs, process::ExitCode};

use anyhow::{Context, Result};
use clap::Args;
use co_rs::lint;
use tracing::info;

use super::{rule_row, Session};

/// Check for rules that match no tracked file
#[derive(Debug, Args)]
pub struct LintArgs {
    /// Remove unused rules from the file instead of reporting them
    #[arg(long)]
    pub fix: bool,
}

pub fn run(session: &Session, args: &LintArgs) -> Result<ExitCode> {
    let rules = session.load_rules()?;
    let tracked = session.git.ls_files(None)?;
    let unused = lint::unused_rules(&rules, &tracked)?;

    if unused.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    if !args.fix {
        println!("Unused rules:");
        for rule in &unused {
            println!("{}", rule_row(rule));
        }
        return Ok(ExitCode::FAILURE);
    }

    let path = session.rules_path()?;
    let fixed = lint::remove_rules(&rules, &unused);
    info!(removed = unused.len(), "removed unused rules");
    fs::write(&path, fixed.to_string())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(ExitCode::SUCCESS)
}
