use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

static RENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\AR(\d+)\t(.*)\t(.*)\z").expect("valid rename regex"));

/// Maps older file names to the names they were renamed to, so that paths
/// from different revisions can be compared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Follower {
    renames: HashMap<String, String>,
}

impl Follower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `git log --name-status --diff-filter=R` output. Lines other
    /// than `R<score>\t<old>\t<new>` are ignored.
    pub fn from_name_status(log: &str) -> Self {
        let mut follower = Self::new();
        for line in log.lines() {
            if let Some(captures) = RENAME.captures(line) {
                follower.insert(&captures[2], &captures[3]);
            }
        }
        follower
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.renames.insert(from.into(), to.into());
    }

    /// Follow renames from `path` to the newest name. A chain that loops back
    /// on itself stops at the first repeated name.
    pub fn latest_name<'a>(&'a self, path: &'a str) -> &'a str {
        let mut visited = HashSet::new();
        let mut current = path;
        while visited.insert(current) {
            match self.renames.get(current) {
                Some(next) => current = next.as_str(),
                None => break,
            }
        }
        current
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }
}
