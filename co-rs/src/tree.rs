use std::{collections::BTreeMap, fmt, ops::Bound};

use crate::ruleset::{Rule, RuleSet};

/// Rules keyed and sorted by their raw pattern text, used for canonical
/// formatting and consolidation.
///
/// The sorted index and the lookup table are the same `BTreeMap`, so every
/// key that can be visited has a rule and vice versa. Keys compare by bytes,
/// which for UTF-8 is the same as comparing by code point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipTree {
    rules: BTreeMap<String, Rule>,
}

impl OwnershipTree {
    /// Index `rules` by pattern. When two rules share a pattern the later one
    /// replaces the earlier.
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut tree = Self::default();
        for rule in rules {
            tree.insert(rule);
        }
        tree
    }

    /// Insert a rule, returning the rule it replaced, if any.
    pub fn insert(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule.raw_pattern().to_owned(), rule)
    }

    pub fn remove(&mut self, pattern: &str) -> Option<Rule> {
        self.rules.remove(pattern)
    }

    pub fn get(&self, pattern: &str) -> Option<&Rule> {
        self.rules.get(pattern)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.rules.contains_key(pattern)
    }

    /// Visit every pattern in ascending order until `visit` returns false.
    pub fn ascend(&self, mut visit: impl FnMut(&str) -> bool) {
        for pattern in self.rules.keys() {
            if !visit(pattern) {
                break;
            }
        }
    }

    /// Visit patterns `>= lower_bound` in ascending order until `visit`
    /// returns false.
    pub fn ascend_from(&self, lower_bound: &str, mut visit: impl FnMut(&str) -> bool) {
        let range = self
            .rules
            .range::<str, _>((Bound::Included(lower_bound), Bound::Unbounded));
        for (pattern, _) in range {
            if !visit(pattern) {
                break;
            }
        }
    }

    /// Rules in ascending pattern order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Rules with patterns strictly greater than `pattern`, ascending.
    pub(crate) fn rules_after<'a>(&'a self, pattern: &str) -> impl Iterator<Item = &'a Rule> {
        self.rules
            .range::<str, _>((Bound::Excluded(pattern), Bound::Unbounded))
            .map(|(_, rule)| rule)
    }

    pub fn patterns(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The canonical text of the rule file: every rule with its comments, in
    /// ascending pattern order, one rule per line.
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// A rule set whose declaration order is the sorted pattern order.
    pub fn to_ruleset(&self) -> RuleSet {
        self.rules.values().cloned().collect()
    }

    pub fn into_ruleset(self) -> RuleSet {
        self.rules.into_values().collect()
    }
}

impl fmt::Display for OwnershipTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in self.rules.values() {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

impl FromIterator<Rule> for OwnershipTree {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        OwnershipTree::new(iter)
    }
}
