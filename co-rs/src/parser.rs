use std::{fs::File, io::Read, path::Path};

use tracing::debug;

use crate::{
    error::{Error, Result, SyntaxError},
    owner::Owner,
    pattern::Pattern,
    ruleset::{Rule, RuleSet},
};

/// Parse the contents of a CODEOWNERS file.
///
/// Blank lines and comment lines are collected into the leading comment of
/// the rule that follows them. The first malformed line aborts the parse.
pub fn parse(source: &str) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();
    let mut leading_comment = String::new();

    for (idx, line) in source.lines().enumerate() {
        let content = line.trim_start();
        if content.is_empty() || content.starts_with('#') {
            leading_comment.push_str(line);
            leading_comment.push('\n');
            continue;
        }

        let line_number = idx + 1;
        let mut rule = Parser::new(line)
            .parse_rule()
            .map_err(|error| Error::Parse {
                line: line_number,
                error,
            })?;
        rule.source_line = line_number;
        rule.leading_comment = std::mem::take(&mut leading_comment);
        rules.push(rule);
    }

    Ok(rules)
}

/// Read and parse a CODEOWNERS file from disk.
pub fn parse_file(path: &Path) -> Result<Vec<Rule>> {
    let mut file = File::open(path)?;
    let mut source = String::new();
    file.read_to_string(&mut source)?;
    let rules = parse(&source)?;
    debug!(path = %path.display(), rules = rules.len(), "loaded rule file");
    Ok(rules)
}

/// Load a CODEOWNERS file straight into a `RuleSet`.
pub fn from_path(path: &Path) -> Result<RuleSet> {
    parse_file(path).map(RuleSet::new)
}

// Parses a single non-comment line. Positions are byte offsets into the line;
// reported columns are 1-based character counts.
struct Parser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn parse_rule(mut self) -> std::result::Result<Rule, SyntaxError> {
        self.skip_whitespace();
        let pattern_column = self.column();
        let raw_pattern = self.parse_pattern();
        if raw_pattern.is_empty() {
            return Err(SyntaxError::UnexpectedEnd);
        }
        let pattern = Pattern::new(raw_pattern).map_err(|err| err.shifted(pattern_column - 1))?;

        let mut owners = Vec::new();
        let mut trailing_comment = None;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('#') => {
                    trailing_comment = Some(self.parse_comment());
                    break;
                }
                Some(_) => owners.push(self.parse_owner()?),
            }
        }

        let mut rule = Rule::new(pattern, owners);
        rule.trailing_comment = trailing_comment;
        Ok(rule)
    }

    // Backslashes stay in the pattern text; the pattern compiler interprets
    // them.
    fn parse_pattern(&mut self) -> &'a str {
        let start = self.pos;
        let mut escaped = false;
        while let Some(c) = self.peek() {
            match c {
                '\\' if !escaped => escaped = true,
                ' ' | '\t' | '#' if !escaped => break,
                _ => escaped = false,
            }
            self.next();
        }
        &self.source[start..self.pos]
    }

    fn parse_owner(&mut self) -> std::result::Result<Owner, SyntaxError> {
        let start = self.pos;
        let column = self.column();
        while let Some(c) = self.peek() {
            if matches!(c, ' ' | '\t' | '#') {
                break;
            }
            self.next();
        }
        Owner::classify(&self.source[start..self.pos])
            .map_err(|err| SyntaxError::Owner(err.shifted(column - 1)))
    }

    fn parse_comment(&mut self) -> String {
        let comment = self.source[self.pos..].trim_end().to_owned();
        self.pos = self.source.len();
        comment
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.next();
        }
    }

    fn column(&self) -> usize {
        self.source[..self.pos].chars().count() + 1
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InvalidOwnerError, InvalidPatternError};

    fn rule(line: usize, pattern: &str, owners: &[&str]) -> Rule {
        let mut rule = Rule::new(
            Pattern::new(pattern).unwrap(),
            owners.iter().map(|o| Owner::classify(o).unwrap()).collect(),
        );
        rule.source_line = line;
        rule
    }

    fn with_comments(mut rule: Rule, leading: &str, trailing: Option<&str>) -> Rule {
        rule.leading_comment = leading.to_owned();
        rule.trailing_comment = trailing.map(ToOwned::to_owned);
        rule
    }

    #[test]
    fn test_parser() {
        let examples = vec![
            (
                "leading comments",
                "# comment a\n\n# comment b\n\nfile.txt @user",
                vec![with_comments(
                    rule(5, "file.txt", &["@user"]),
                    "# comment a\n\n# comment b\n\n",
                    None,
                )],
            ),
            (
                "username owners",
                "file.txt @user",
                vec![rule(1, "file.txt", &["@user"])],
            ),
            (
                "team owners",
                "file.txt @org/team",
                vec![rule(1, "file.txt", &["@org/team"])],
            ),
            (
                "email owners",
                "file.txt foo@example.com",
                vec![rule(1, "file.txt", &["foo@example.com"])],
            ),
            (
                "multiple owners",
                "file.txt @user @org/team foo@example.com",
                vec![rule(1, "file.txt", &["@user", "@org/team", "foo@example.com"])],
            ),
            (
                "complex patterns",
                "d?r/* @user",
                vec![rule(1, "d?r/*", &["@user"])],
            ),
            (
                "pattern with space",
                "foo\\ bar @user",
                vec![rule(1, "foo\\ bar", &["@user"])],
            ),
            (
                "escaped hash",
                "\\#notes @user",
                vec![rule(1, "\\#notes", &["@user"])],
            ),
            (
                "trailing comment",
                "file.txt @user # some comment  ",
                vec![with_comments(
                    rule(1, "file.txt", &["@user"]),
                    "",
                    Some("# some comment"),
                )],
            ),
            (
                "comment directly after owner",
                "file.txt @user# some comment",
                vec![with_comments(
                    rule(1, "file.txt", &["@user"]),
                    "",
                    Some("# some comment"),
                )],
            ),
            ("no owners", "pattern", vec![rule(1, "pattern", &[])]),
            (
                "no owners with comment",
                "pattern # but no more",
                vec![with_comments(rule(1, "pattern", &[]), "", Some("# but no more"))],
            ),
            ("trailing whitespace", "pattern ", vec![rule(1, "pattern", &[])]),
            (
                "surrounding whitespace",
                " \tpattern @user ",
                vec![rule(1, "pattern", &["@user"])],
            ),
            (
                "crlf line endings",
                "# a\r\nfoo @a\r\n\r\nbar @b\r\n",
                vec![
                    with_comments(rule(2, "foo", &["@a"]), "# a\n", None),
                    with_comments(rule(4, "bar", &["@b"]), "\n", None),
                ],
            ),
            (
                "indented comment",
                "  # indented\nfoo",
                vec![with_comments(rule(2, "foo", &[]), "  # indented\n", None)],
            ),
            ("empty file", "", vec![]),
            ("only comments", "# a\n\n# b\n", vec![]),
        ];

        for (name, source, expected) in examples {
            assert_eq!(
                parse(source).unwrap(),
                expected,
                "result mismatch for {}",
                name
            );
        }
    }

    #[test]
    fn test_parse_errors() {
        let examples = vec![
            (
                "file.{txt @user",
                1,
                SyntaxError::Pattern(InvalidPatternError::UnexpectedCharacter {
                    character: '{',
                    column: 6,
                }),
                "line 1: unexpected character '{' at column 6",
            ),
            (
                "file.[cC] @user",
                1,
                SyntaxError::Pattern(InvalidPatternError::UnexpectedCharacter {
                    character: '[',
                    column: 6,
                }),
                "line 1: unexpected character '[' at column 6",
            ),
            (
                "file.txt missing-at-sign",
                1,
                SyntaxError::Owner(InvalidOwnerError {
                    owner: "missing-at-sign".to_owned(),
                    column: 10,
                }),
                "line 1: invalid owner format 'missing-at-sign' at column 10",
            ),
            (
                "# ok\nok @a\n  😃/{x} @a",
                3,
                SyntaxError::Pattern(InvalidPatternError::UnexpectedCharacter {
                    character: '{',
                    column: 5,
                }),
                "line 3: unexpected character '{' at column 5",
            ),
            (
                "foo @a bad",
                1,
                SyntaxError::Owner(InvalidOwnerError {
                    owner: "bad".to_owned(),
                    column: 8,
                }),
                "line 1: invalid owner format 'bad' at column 8",
            ),
            (
                "foo\\",
                1,
                SyntaxError::Pattern(InvalidPatternError::DanglingEscape { column: 4 }),
                "line 1: unfinished escape at column 4",
            ),
        ];

        for (source, expected_line, expected_error, message) in examples {
            let err = parse(source).unwrap_err();
            assert_eq!(err.to_string(), message, "message mismatch for `{}`", source);
            match err {
                Error::Parse { line, error } => {
                    assert_eq!(line, expected_line, "line mismatch for `{}`", source);
                    assert_eq!(error, expected_error, "error mismatch for `{}`", source);
                }
                other => panic!("expected parse error for `{}`, got {:?}", source, other),
            }
        }
    }

    #[test]
    fn test_null_bytes_are_rejected() {
        let err = parse("f\0oo @a").unwrap_err();
        assert_eq!(err.to_string(), "line 1: unexpected character '\0' at column 2");
    }

    #[test]
    fn test_round_trip_preserves_text() {
        let source = "# Owners\n\n*  @everyone\n/docs/\\ notes/ docs@example.com # docs\n";
        let rules = parse(source).unwrap();
        let written = RuleSet::new(rules).to_string();
        assert_eq!(
            written,
            "# Owners\n\n* @everyone\n/docs/\\ notes/ docs@example.com # docs\n"
        );
    }
}
