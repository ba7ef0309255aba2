//! Removal of rules whose ownership is already implied by an ancestor rule.
//!
//! The tree is written back out in sorted order, so sorted order is also the
//! precedence order of the rewritten file. A rule `K` may be dropped in favour
//! of an earlier root `R` only when:
//!
//! * `R` matches every path `K` matches (see [`covers`]),
//! * `R` and `K` have the same owner set, and
//! * no rule sorted between them could win over `R` for one of `K`'s paths
//!   with different owners.
//!
//! A covered descendant with different owners abandons the whole root, so a
//! subtree is rolled up completely or not at all.

use tracing::{debug, trace};

use crate::{pattern::Pattern, ruleset::Rule, tree::OwnershipTree};

/// Remove redundant rules from `tree` in place, returning the removed rules
/// in the order they were dropped. Running it again on the result removes
/// nothing.
pub fn consolidate(tree: &mut OwnershipTree) -> Vec<Rule> {
    let mut removed = Vec::new();

    for root in tree.patterns() {
        let redundant = match tree.get(&root) {
            Some(rule) => redundant_descendants(tree, rule),
            // Already absorbed by an earlier root
            None => continue,
        };

        for pattern in redundant {
            if let Some(rule) = tree.remove(&pattern) {
                debug!(root = %root, pattern = %pattern, "removed redundant rule");
                removed.push(rule);
            }
        }
    }

    removed
}

fn redundant_descendants(tree: &OwnershipTree, root: &Rule) -> Vec<String> {
    let prefix = root.pattern.subtree_prefix();
    let scope = root.pattern.leading_literals();
    let mut redundant = Vec::new();

    for candidate in tree.rules_after(root.raw_pattern()) {
        let pattern = candidate.raw_pattern();
        let nested = pattern.starts_with(prefix);

        // Everything sharing the prefix is contiguous, so once past it no
        // later pattern can be nested
        if !nested && pattern > prefix {
            break;
        }

        if nested && covers(&root.pattern, &candidate.pattern) {
            if !root.same_owners(candidate) {
                trace!(
                    root = root.raw_pattern(),
                    pattern,
                    "descendant has different owners, keeping subtree"
                );
                return Vec::new();
            }
            redundant.push(pattern.to_owned());
            continue;
        }

        // A rule that stays behind sits between the root and everything
        // after it, so it must not be able to claim those paths
        if disjoint(scope, &candidate.pattern) || root.same_owners(candidate) {
            continue;
        }
        trace!(
            root = root.raw_pattern(),
            pattern,
            "intervening rule may override root"
        );
        break;
    }

    redundant
}

/// True when `ancestor` matches every path `descendant` can match.
///
/// Only anchored descendants with a literal lead are considered: they match
/// their literal path and what lies beneath it, which a recursive ancestor
/// matching that literal path covers too.
pub fn covers(ancestor: &Pattern, descendant: &Pattern) -> bool {
    if ancestor.is_universal() {
        return true;
    }
    if !ancestor.is_recursive() {
        return false;
    }

    let literals = descendant.literal_segments();
    if literals.is_empty() {
        return false;
    }
    // Descendant literals never contain NUL, so matching cannot fail
    ancestor.is_match(&literals.join("/")).unwrap_or(false)
}

// Whether `pattern` is confined to paths that leave `scope` at some segment.
fn disjoint(scope: &[String], pattern: &Pattern) -> bool {
    let literals = pattern.literal_segments();
    !scope.is_empty()
        && !literals.is_empty()
        && scope.iter().zip(literals).any(|(a, b)| a != b)
}
