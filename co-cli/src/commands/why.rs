use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use co_rs::Rule;
use serde_json::{json, Value};

use super::Session;

/// Show the rule that decides ownership of a single file
///
/// Unmatched files are reported with line -1.
#[derive(Debug, Args)]
pub struct WhyArgs {
    pub file: String,

    /// Print JSON: {path, line, rule, owners}
    #[arg(short, long)]
    pub json: bool,
}

pub fn run(session: &Session, args: &WhyArgs) -> Result<ExitCode> {
    let rules = session.load_rules()?;
    let rule = rules.matching_rule(&args.file)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&as_json(&args.file, rule))?);
    } else {
        println!("{}", row(rule));
    }
    Ok(ExitCode::SUCCESS)
}

fn row(rule: Option<&Rule>) -> String {
    match rule {
        Some(rule) => format!("  {}", super::rule_row(rule)),
        None => format!("  {:>4} {:<70} (unowned)", -1, "(no match)"),
    }
}

fn as_json(path: &str, rule: Option<&Rule>) -> Value {
    match rule {
        Some(rule) => json!({
            "path": path,
            "line": rule.source_line,
            "rule": rule.raw_pattern(),
            "owners": rule.owner_strings(),
        }),
        None => json!({
            "path": path,
            "line": -1,
            "rule": null,
            "owners": null,
        }),
    }
}
