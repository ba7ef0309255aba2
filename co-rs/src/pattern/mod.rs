//! Gitignore-style path patterns as used in CODEOWNERS files.
//!
//! Supported syntax: `*` (any run of characters within a segment), `?` (one
//! character within a segment), `**` as a whole segment (zero or more
//! segments), a leading `/` or any inner `/` to anchor at the root, a trailing
//! `/` to name a directory, and `\` to take the next character literally.
//! Brace expansion and character classes are rejected at compile time.

mod nfa;
mod segment;

use std::fmt;

use self::{
    nfa::Nfa,
    segment::{Piece, Segment},
};
use crate::error::{InvalidPatternError, MatchError};

/// A compiled pattern. The original text is kept verbatim, escapes included,
/// so that rules can be written back out unchanged.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    anchored: bool,
    dir_only: bool,
    recursive: bool,
    universal: bool,
    leading_literals: Vec<String>,
    subtree_prefix: String,
    nfa: Nfa,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Result<Pattern, InvalidPatternError> {
        let source = source.into();
        if source.is_empty() {
            return Err(InvalidPatternError::Empty);
        }

        let mut pieces = segment::lex(&source)?;

        let leading_slash = matches!(pieces.first(), Some((Piece::Separator, _)));
        if leading_slash {
            pieces.remove(0);
        }
        let trailing_slash = matches!(pieces.last(), Some((Piece::Separator, _)));
        if trailing_slash {
            pieces.pop();
        }
        // A lone "/" names the root directory
        let dir_only = trailing_slash || (leading_slash && pieces.is_empty());

        let inner_slash = pieces.iter().any(|(p, _)| *p == Piece::Separator);
        let anchored = leading_slash || inner_slash;

        // Group pieces into segments, remembering where each one starts in the
        // source text. Empty segments (from `a//b`) are dropped.
        let mut segments: Vec<(Segment, usize)> = Vec::new();
        let mut tokens = Vec::new();
        let mut segment_start = None;
        for (piece, offset) in pieces {
            match piece {
                Piece::Separator => {
                    if let Some(start) = segment_start.take() {
                        segments.push((Segment::from_tokens(std::mem::take(&mut tokens)), start));
                    }
                }
                Piece::Token(token) => {
                    segment_start.get_or_insert(offset);
                    tokens.push(token);
                }
            }
        }
        if let Some(start) = segment_start {
            segments.push((Segment::from_tokens(tokens), start));
        }

        let first_wildcard = segments.iter().position(|(s, _)| s.has_wildcard());
        let leading_literals = segments[..first_wildcard.unwrap_or(segments.len())]
            .iter()
            .filter_map(|(s, _)| s.literal())
            .collect::<Vec<_>>();
        let subtree_prefix = match first_wildcard {
            Some(idx) => source[..segments[idx].1].to_owned(),
            None if dir_only => source.clone(),
            None => format!("{}/", source),
        };

        let segments = segments.into_iter().map(|(s, _)| s).collect::<Vec<_>>();
        let floating = !anchored || segments.first() == Some(&Segment::DoubleStar);

        // A final lone `*` matches a single level only, as in CODEOWNERS
        let recursive = dir_only || !segments.last().map_or(false, Segment::is_single_star);

        let core = segments
            .iter()
            .skip_while(|s| **s == Segment::DoubleStar)
            .collect::<Vec<_>>();
        let universal = core.is_empty()
            || (core.len() == 1 && core[0].is_single_star() && (floating || dir_only));

        let nfa = Nfa::build(&segments, floating, recursive)?;

        Ok(Pattern {
            source,
            anchored,
            dir_only,
            recursive,
            universal,
            leading_literals,
            subtree_prefix,
            nfa,
        })
    }

    /// Test a slash-separated, repository-relative path.
    pub fn is_match(&self, path: &str) -> Result<bool, MatchError> {
        if path.contains('\0') {
            return Err(MatchError {
                path: path.to_owned(),
                reason: "paths cannot contain null bytes",
            });
        }
        let segments = path.split('/').filter(|s| !s.is_empty());
        Ok(self.nfa.is_match(segments))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the pattern is tied to the repository root rather than
    /// matching at any depth.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    /// True when every path beneath a matched path is matched too.
    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// True when the pattern matches every non-empty path.
    pub fn is_universal(&self) -> bool {
        self.universal
    }

    /// The unescaped leading segments that every matched path must start
    /// with. Empty for floating patterns.
    pub fn literal_segments(&self) -> &[String] {
        if self.anchored && !self.leading_literals.is_empty() {
            &self.leading_literals
        } else {
            &[]
        }
    }

    /// The unescaped segments before the first wildcard, regardless of
    /// anchoring.
    pub(crate) fn leading_literals(&self) -> &[String] {
        &self.leading_literals
    }

    /// The raw-text prefix shared by the patterns that sit beneath this one in
    /// a sorted rule list: the pattern itself when it names a directory, the
    /// pattern plus `/` for plain literals, and the text before the first
    /// wildcard segment for globs.
    pub fn subtree_prefix(&self) -> &str {
        &self.subtree_prefix
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Pattern {
    type Err = InvalidPatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_matches(pattern: &str, path: &str, expected: bool) {
        let compiled = Pattern::new(pattern).unwrap();
        assert_eq!(
            compiled.is_match(path).unwrap(),
            expected,
            "expected `{}` matching `{}` to be {}",
            pattern,
            path,
            expected
        );
    }

    #[test]
    fn test_literals() {
        let examples = vec![
            ("/src/parser/mod.rs", "src/parser/mod.rs", true),
            ("/src/parser/mod.rs", "lib/src/parser/mod.rs", false),
            ("mod.rs", "src/parser/mod.rs", true),
            ("mod.rs", "mod.rs", true),
            ("mod.rs", "src/lexer/mod.go", false),
            ("src/parser", "src/parser/mod.rs", true),
            ("src/parser", "foo/src/parser/mod.rs", false),
            ("src", "foo/src/parser/mod.rs", true),
        ];
        for (pattern, path, expected) in examples {
            assert_matches(pattern, path, expected);
        }
    }

    #[test]
    fn test_anchoring() {
        let examples = vec![
            ("*.go", "a/b/c.go", true),
            ("*.go", "c.go", true),
            ("/x.go", "x.go", true),
            ("/x.go", "a/x.go", false),
            ("root/", "root/a/b", true),
            ("root/", "rootx/a", false),
            ("root/", "root", true),
            ("root/", "a/root/b", true),
            ("/root/", "a/root/b", false),
            ("/script/foo", "bar/script/foo", false),
            ("script/foo", "bar/script/foo", false),
            ("script/foo", "script/foo", true),
        ];
        for (pattern, path, expected) in examples {
            assert_matches(pattern, path, expected);
        }
    }

    #[test]
    fn test_wildcards() {
        let examples = vec![
            ("src/*/mod.rs", "src/parser/mod.rs", true),
            ("src/*/mod.rs", "src/parser/sub/mod.rs", false),
            ("*/*/mod.rs", "test/lexer/mod.rs", true),
            ("*/*/mod.rs", "parser/mod.rs", false),
            ("/src/p*/*.*", "src/p/lib.go", true),
            ("/src/parser/*.rs", "src/parser/README", false),
            ("d?r/*", "dir/file", true),
            ("d?r/*", "dr/file", false),
        ];
        for (pattern, path, expected) in examples {
            assert_matches(pattern, path, expected);
        }
    }

    #[test]
    fn test_trailing_wildcards() {
        let examples = vec![
            ("/mammals/*", "mammals", false),
            ("/mammals/*", "mammals/equus", true),
            ("/mammals/*", "mammals/equus/zebra", false),
            ("/fish/*/", "fish", false),
            ("/fish/*/", "fish/gaddus", true),
            ("/fish/*/", "fish/gaddus/cod", true),
            ("*", "anything/at/all", true),
            ("/*", "top", true),
            ("/*", "top/nested", false),
        ];
        for (pattern, path, expected) in examples {
            assert_matches(pattern, path, expected);
        }
    }

    #[test]
    fn test_double_stars() {
        let examples = vec![
            ("/**/baz", "x/y/baz", true),
            ("/**/baz", "baz", true),
            ("/**/bar/baz", "x/bar/baz", true),
            ("/foo/**/qux", "foo/qux", true),
            ("/foo/**/qux", "foo/bar/baz/qux", true),
            ("/foo/**/qux", "foo/bar", false),
            ("/foo/**/qux", "bar/qux", false),
            ("a/**/b", "a/b", true),
            ("foo/**", "foo/bar/baz", true),
            ("foo/**", "foo", false),
            ("**", "bar", true),
            ("**", "x/y/baz", true),
        ];
        for (pattern, path, expected) in examples {
            assert_matches(pattern, path, expected);
        }
    }

    #[test]
    fn test_escapes() {
        let pattern = Pattern::new(r"foo\ bar").unwrap();
        assert!(pattern.is_match("foo bar").unwrap());
        assert!(pattern.is_match("x/foo bar").unwrap());
        assert!(!pattern.is_match(r"foo\ bar").unwrap());
        assert_eq!(pattern.to_string(), r"foo\ bar");

        assert_matches(r"docs/\*.md", "docs/*.md", true);
        assert_matches(r"docs/\*.md", "docs/a.md", false);
        assert_matches(r"\#notes", "#notes", true);
    }

    #[test]
    fn test_case_sensitive_unicode() {
        assert_matches("README", "readme", false);
        assert_matches("root/😃", "root/😃/a", true);
        assert_matches("root/😃", "root/😃😃", false);
        assert_matches("root/?", "root/😃", true);
    }

    #[test]
    fn test_flags() {
        let examples = vec![
            // (pattern, anchored, dir_only, recursive, universal)
            ("*.go", false, false, true, false),
            ("/x.go", true, false, true, false),
            ("root/", false, true, true, false),
            ("root/a", true, false, true, false),
            ("root/*", true, false, false, false),
            ("*", false, false, false, true),
            ("**", false, false, true, true),
            ("**/*", true, false, false, true),
            ("/*", true, false, false, false),
            ("/", true, true, true, true),
        ];
        for (source, anchored, dir_only, recursive, universal) in examples {
            let p = Pattern::new(source).unwrap();
            assert_eq!(
                (p.is_anchored(), p.is_dir_only(), p.is_recursive(), p.is_universal()),
                (anchored, dir_only, recursive, universal),
                "flag mismatch for `{}`",
                source
            );
        }
    }

    #[test]
    fn test_subtree_prefix_and_literals() {
        let examples: Vec<(&str, &str, &[&str])> = vec![
            ("root", "root/", &[]),
            ("root/", "root/", &[]),
            ("/root/a", "/root/a/", &["root", "a"]),
            ("root/*", "root/", &["root"]),
            ("root/a*/b", "root/", &["root"]),
            ("*", "", &[]),
            ("**/x", "", &[]),
            (r"a\ b/c", r"a\ b/c/", &["a b", "c"]),
        ];
        for (source, prefix, literals) in examples {
            let p = Pattern::new(source).unwrap();
            assert_eq!(p.subtree_prefix(), prefix, "prefix mismatch for `{}`", source);
            assert_eq!(
                p.literal_segments(),
                literals
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .as_slice(),
                "literal mismatch for `{}`",
                source
            );
        }
    }

    #[test]
    fn test_compile_errors() {
        assert_eq!(Pattern::new("").unwrap_err(), InvalidPatternError::Empty);
        assert_eq!(
            Pattern::new("file.[cC]").unwrap_err(),
            InvalidPatternError::UnexpectedCharacter {
                character: '[',
                column: 6
            }
        );
        assert_eq!(
            Pattern::new("src/{a,b}").unwrap_err(),
            InvalidPatternError::UnexpectedCharacter {
                character: '{',
                column: 5
            }
        );
    }

    #[test]
    fn test_match_errors() {
        let pattern = Pattern::new("*").unwrap();
        let err = pattern.is_match("a\0b").unwrap_err();
        assert_eq!(err.path, "a\0b");
    }

    #[test]
    fn test_same_source_same_behaviour() {
        let a = Pattern::new("src/**/*.rs").unwrap();
        let b = Pattern::new("src/**/*.rs").unwrap();
        assert_eq!(a, b);
        for path in ["src/a.rs", "src/x/y/z.rs", "lib/a.rs", "src/a.go"] {
            assert_eq!(a.is_match(path).unwrap(), b.is_match(path).unwrap());
        }
    }
}
