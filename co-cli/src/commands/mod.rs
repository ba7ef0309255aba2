use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use co_rs::{parser, FileOwners, Rule, RuleSet};
use tracing::debug;

use crate::git::Git;

pub mod diff;
pub mod fmt;
pub mod lint;
pub mod stats;
pub mod who;
pub mod why;

/// State shared by every subcommand: the repository and the rule file the
/// user pointed at, if any.
pub struct Session {
    pub git: Git,
    file: Option<PathBuf>,
}

impl Session {
    pub fn new(git: Git, file: Option<PathBuf>) -> Session {
        Session { git, file }
    }

    /// The rule file on disk: the explicit `--file`, or the first standard
    /// location that exists.
    pub fn rules_path(&self) -> Result<PathBuf> {
        match &self.file {
            Some(file) => Ok(file.clone()),
            None => self.git.find_rules_file().ok_or_else(|| {
                anyhow!(
                    "no CODEOWNERS file found under {}; pass one with --file",
                    self.git.root().display()
                )
            }),
        }
    }

    pub fn load_rules(&self) -> Result<RuleSet> {
        let path = self.rules_path()?;
        co_rs::from_path(&path).with_context(|| format!("failed to load {}", path.display()))
    }

    /// Rules as committed at `reference`.
    pub fn load_rules_at(&self, reference: &str) -> Result<RuleSet> {
        let location = match &self.file {
            Some(file) => self.repo_relative(file),
            None => self
                .git
                .find_rules_file_at(reference)?
                .map(str::to_owned)
                .ok_or_else(|| anyhow!("no CODEOWNERS file found at {}", reference))?,
        };
        debug!(reference, location = %location, "loading rules from git");
        let source = self.git.show(reference, &location)?;
        let rules = parser::parse(&source)
            .with_context(|| format!("failed to parse {}:{}", reference, location))?;
        Ok(RuleSet::new(rules))
    }

    fn repo_relative(&self, file: &Path) -> String {
        let relative = file.strip_prefix(self.git.root()).unwrap_or(file);
        let relative = relative.strip_prefix(".").unwrap_or(relative);
        relative.to_string_lossy().into_owned()
    }
}

/// `{path:<70} [owners]`, the row format shared by `who` and `diff`.
pub(crate) fn owners_row(entry: &FileOwners) -> String {
    format!("{:<70} [{}]", entry.path, entry.owners.join(" "))
}

pub(crate) fn rule_row(rule: &Rule) -> String {
    format!(
        "{:>4} {:<70} [{}]",
        rule.source_line,
        rule.raw_pattern(),
        rule.owner_strings().join(" ")
    )
}
