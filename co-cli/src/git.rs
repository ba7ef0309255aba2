use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{bail, Context, Result};
use co_rs::Follower;
use tracing::debug;

/// Where CODEOWNERS files are looked for, in order, relative to the
/// repository root.
pub const STANDARD_LOCATIONS: &[&str] = &[
    "CODEOWNERS",
    ".github/CODEOWNERS",
    ".gitlab/CODEOWNERS",
    "docs/CODEOWNERS",
];

/// Runs git commands from the repository root, so every path it reports is
/// relative to the root regardless of the current directory.
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    /// Locate the enclosing repository, falling back to the current
    /// directory outside of one.
    pub fn discover() -> Git {
        let root = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .output()
            .ok()
            .filter(|output| output.status.success())
            .map(|output| PathBuf::from(String::from_utf8_lossy(&output.stdout).trim()))
            .unwrap_or_else(|| PathBuf::from("."));
        debug!(root = %root.display(), "using repository root");
        Git { root }
    }

    pub fn at(root: impl Into<PathBuf>) -> Git {
        Git { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files tracked at `reference`, or in the index when `reference` is
    /// `None`.
    pub fn ls_files(&self, reference: Option<&str>) -> Result<Vec<String>> {
        let output = match reference {
            Some(reference) => self.run(&["ls-tree", "-r", "-z", "--full-tree", "--name-only", reference])?,
            None => self.run(&["ls-files", "-z", "--full-name"])?,
        };
        Ok(output
            .split(|byte| *byte == 0)
            .filter(|entry| !entry.is_empty())
            .map(|entry| String::from_utf8_lossy(entry).into_owned())
            .collect())
    }

    /// The contents of `path` at `reference`.
    pub fn show(&self, reference: &str, path: &str) -> Result<String> {
        let object = format!("{}:{}", reference, path);
        let output = self
            .run(&["show", &object])
            .with_context(|| format!("could not load rules at {}", object))?;
        String::from_utf8(output).with_context(|| format!("{} is not valid UTF-8", object))
    }

    pub fn is_valid_ref(&self, reference: &str) -> bool {
        self.run(&["rev-parse", "--verify", "--quiet", reference]).is_ok()
    }

    /// Renames between `base` and `current` (`HEAD` when `None`).
    pub fn renames(&self, base: &str, current: Option<&str>) -> Result<Follower> {
        let range = format!("{}..{}", base, current.unwrap_or("HEAD"));
        let log = self.run(&[
            "log",
            "--name-status",
            "--pretty=format:",
            "--diff-filter=R",
            &range,
        ])?;
        let follower = Follower::from_name_status(&String::from_utf8_lossy(&log));
        debug!(range = %range, renames = follower.len(), "collected renames");
        Ok(follower)
    }

    /// The first standard CODEOWNERS location present on disk.
    pub fn find_rules_file(&self) -> Option<PathBuf> {
        STANDARD_LOCATIONS
            .iter()
            .map(|location| self.root.join(location))
            .find(|path| path.is_file())
    }

    /// The first standard CODEOWNERS location tracked at `reference`.
    pub fn find_rules_file_at(&self, reference: &str) -> Result<Option<&'static str>> {
        let files = self.ls_files(Some(reference))?;
        Ok(STANDARD_LOCATIONS
            .iter()
            .copied()
            .find(|location| files.iter().any(|file| file == location)))
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let output = Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .output()
            .context("failed to run git; is it installed and in PATH?")?;

        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(output.stdout)
    }
}
