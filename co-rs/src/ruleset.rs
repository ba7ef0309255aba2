use std::{collections::BTreeSet, fmt};

use crate::{
    error::{MatchError, Result},
    owner::Owner,
    pattern::Pattern,
    tree::OwnershipTree,
};

/// A pattern with the owners it assigns, plus the source details needed to
/// write it back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// 1-based line the rule was read from, or 0 for rules built in code.
    pub source_line: usize,
    /// Comment and blank lines directly above the rule, each ending in `\n`.
    pub leading_comment: String,
    /// Text from the unescaped `#` to the end of the rule line.
    pub trailing_comment: Option<String>,
    pub pattern: Pattern,
    /// Owners in source order. Empty means the path is explicitly unowned.
    pub owners: Vec<Owner>,
}

impl Rule {
    pub fn new(pattern: Pattern, owners: Vec<Owner>) -> Rule {
        Rule {
            source_line: 0,
            leading_comment: String::new(),
            trailing_comment: None,
            pattern,
            owners,
        }
    }

    pub fn raw_pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_match(&self, path: &str) -> Result<bool, MatchError> {
        self.pattern.is_match(path)
    }

    /// Owners as an unordered set of rendered tokens.
    pub fn owner_set(&self) -> BTreeSet<String> {
        self.owners.iter().map(ToString::to_string).collect()
    }

    pub fn same_owners(&self, other: &Rule) -> bool {
        self.owner_set() == other.owner_set()
    }

    pub fn owner_strings(&self) -> Vec<String> {
        self.owners.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.leading_comment)?;
        f.write_str(self.pattern.as_str())?;
        for owner in &self.owners {
            write!(f, " {}", owner)?;
        }
        if let Some(comment) = &self.trailing_comment {
            write!(f, " {}", comment)?;
        }
        Ok(())
    }
}

/// Rules in declaration order. Order is precedence: when several rules match
/// a path, the one declared last wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The rule governing `path`, or `None` when no rule matches. A rule with
    /// no owners is still returned; callers tell "unmatched" from "explicitly
    /// unowned" by the presence of the rule.
    pub fn matching_rule(&self, path: &str) -> Result<Option<&Rule>, MatchError> {
        for rule in self.rules.iter().rev() {
            if rule.is_match(path)? {
                return Ok(Some(rule));
            }
        }
        Ok(None)
    }

    /// Every rule matching `path`, with its index, in declaration order.
    pub fn matching_rules(&self, path: &str) -> Result<Vec<(usize, &Rule)>, MatchError> {
        let mut matches = Vec::new();
        for (idx, rule) in self.rules.iter().enumerate() {
            if rule.is_match(path)? {
                matches.push((idx, rule));
            }
        }
        Ok(matches)
    }

    pub fn owners(&self, path: &str) -> Result<Option<&[Owner]>, MatchError> {
        Ok(self.matching_rule(path)?.and_then(|rule| {
            if rule.owners.is_empty() {
                None
            } else {
                Some(rule.owners.as_ref())
            }
        }))
    }

    /// Rebuild the set without the rules read from the given source lines.
    pub fn without_lines(&self, lines: &[usize]) -> RuleSet {
        RuleSet {
            rules: self
                .rules
                .iter()
                .filter(|rule| !lines.contains(&rule.source_line))
                .cloned()
                .collect(),
        }
    }

    pub fn into_tree(self) -> OwnershipTree {
        OwnershipTree::new(self.rules)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        RuleSet::new(rules)
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        RuleSet::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Writes one rule per line in declaration order.
impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

pub struct RuleSetBuilder {
    rules: Vec<Rule>,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Compile `pattern` and append a rule for it.
    pub fn add_pattern(&mut self, pattern: &str, owners: &[&str]) -> Result<&mut Self> {
        let pattern = Pattern::new(pattern)?;
        let owners = owners
            .iter()
            .map(|o| Owner::classify(o))
            .collect::<Result<Vec<_>, _>>()?;
        self.rules.push(Rule::new(pattern, owners));
        Ok(self)
    }

    pub fn build(self) -> RuleSet {
        RuleSet { rules: self.rules }
    }
}

impl Default for RuleSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
