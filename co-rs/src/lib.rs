//! Resolve, format and consolidate CODEOWNERS rules.
//!
//! A rule file is an ordered list of gitignore-style patterns, each assigned
//! zero or more owners. For any path the last matching rule wins.
//!
//! ```
//! use co_rs::{consolidate, parser, RuleSet};
//!
//! let rules = parser::parse("* @everyone\n/docs/ @docs\n/docs/api/ @docs\n").unwrap();
//! let ruleset = RuleSet::new(rules);
//!
//! let rule = ruleset.matching_rule("docs/api/index.md").unwrap().unwrap();
//! assert_eq!(rule.raw_pattern(), "/docs/api/");
//!
//! let mut tree = ruleset.into_tree();
//! consolidate(&mut tree);
//! assert_eq!(tree.serialize(), "* @everyone\n/docs/ @docs\n");
//! ```

mod consolidate;
mod error;
pub mod lint;
pub mod list;
mod owner;
pub mod parser;
pub mod pattern;
mod renames;
mod ruleset;
pub mod stats;
mod tree;

pub use consolidate::{consolidate, covers};
pub use error::{
    Error, InvalidOwnerError, InvalidPatternError, MatchError, Result, SyntaxError,
};
pub use list::{list_owners, FileOwners, OwnerFilter, UNOWNED};
pub use owner::{Owner, OwnerKind};
pub use parser::from_path;
pub use pattern::Pattern;
pub use renames::Follower;
pub use ruleset::{Rule, RuleSet, RuleSetBuilder};
pub use stats::{FilesPerOwner, OwnershipStats};
pub use tree::OwnershipTree;
