use std::{fs, process::ExitCode};

use anyhow::{Context, Result};
use clap::Args;
use co_rs::{consolidate, RuleSet};
use tracing::info;

use super::Session;

/// Rewrite a CODEOWNERS file in canonical order
///
/// Rules are sorted by pattern, each keeping its comments.
#[derive(Debug, Args)]
pub struct FmtArgs {
    /// Remove rules made redundant by an ancestor with the same owners
    #[arg(short, long)]
    pub trim: bool,
}

pub fn run(session: &Session, args: &FmtArgs) -> Result<ExitCode> {
    let path = session.rules_path()?;
    let rules = session.load_rules()?;
    let formatted = format_rules(rules, args.trim);
    fs::write(&path, formatted).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(ExitCode::SUCCESS)
}

fn format_rules(rules: RuleSet, trim: bool) -> String {
    let mut tree = rules.into_tree();
    if trim {
        let removed = consolidate(&mut tree);
        info!(removed = removed.len(), "trimmed redundant rules");
    }
    tree.serialize()
}
