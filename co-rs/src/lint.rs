use tracing::debug;

use crate::{
    error::MatchError,
    ruleset::{Rule, RuleSet},
};

/// Rules whose pattern matches none of `tracked_paths`, in declaration order.
pub fn unused_rules<'r, S: AsRef<str>>(
    rules: &'r RuleSet,
    tracked_paths: &[S],
) -> Result<Vec<&'r Rule>, MatchError> {
    let mut unused = Vec::new();
    'rules: for rule in rules {
        for path in tracked_paths {
            if rule.is_match(path.as_ref())? {
                continue 'rules;
            }
        }
        debug!(line = rule.source_line, pattern = rule.raw_pattern(), "unused rule");
        unused.push(rule);
    }
    Ok(unused)
}

/// Drop the given rules, keeping everything else in declaration order.
///
/// Rules are identified by source line, so this is meant for rule sets read
/// from a file.
pub fn remove_rules(rules: &RuleSet, unused: &[&Rule]) -> RuleSet {
    let lines = unused.iter().map(|rule| rule.source_line).collect::<Vec<_>>();
    rules.without_lines(&lines)
}
