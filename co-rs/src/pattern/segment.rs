use crate::error::InvalidPatternError;

/// A single lexed unit of a pattern. Escaped characters are always
/// `Literal`, so `\*` never acts as a wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(char),
    Star,
    Question,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece {
    Separator,
    Token(Token),
}

/// One `/`-delimited component of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    DoubleStar,
    Glob(Vec<Token>),
}

impl Segment {
    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Segment {
        if tokens == [Token::Star, Token::Star] {
            Segment::DoubleStar
        } else {
            Segment::Glob(tokens)
        }
    }

    pub(crate) fn is_single_star(&self) -> bool {
        matches!(self, Segment::Glob(tokens) if tokens.iter().all(|t| *t == Token::Star))
    }

    pub(crate) fn has_wildcard(&self) -> bool {
        match self {
            Segment::DoubleStar => true,
            Segment::Glob(tokens) => tokens.iter().any(|t| !matches!(t, Token::Literal(_))),
        }
    }

    /// The unescaped text of a wildcard-free segment.
    pub(crate) fn literal(&self) -> Option<String> {
        match self {
            Segment::DoubleStar => None,
            Segment::Glob(tokens) => tokens
                .iter()
                .map(|t| match t {
                    Token::Literal(c) => Some(*c),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Lex a raw pattern into pieces, paired with the byte offset each piece
/// starts at in `source`. Brace expansion and character classes are
/// rejected rather than half-supported.
pub(crate) fn lex(source: &str) -> Result<Vec<(Piece, usize)>, InvalidPatternError> {
    let mut pieces = Vec::with_capacity(source.len());
    let mut escape_start = None;

    for (column, (offset, c)) in source.char_indices().enumerate().map(|(i, x)| (i + 1, x)) {
        if c == '\0' {
            return Err(InvalidPatternError::UnexpectedCharacter {
                character: c,
                column,
            });
        }

        if let Some(start) = escape_start.take() {
            pieces.push((Piece::Token(Token::Literal(c)), start));
            continue;
        }

        let piece = match c {
            '\\' => {
                escape_start = Some(offset);
                continue;
            }
            '[' | ']' | '{' | '}' => {
                return Err(InvalidPatternError::UnexpectedCharacter {
                    character: c,
                    column,
                })
            }
            '/' => Piece::Separator,
            '*' => Piece::Token(Token::Star),
            '?' => Piece::Token(Token::Question),
            _ => Piece::Token(Token::Literal(c)),
        };
        pieces.push((piece, offset));
    }

    if escape_start.is_some() {
        return Err(InvalidPatternError::DanglingEscape {
            column: source.chars().count(),
        });
    }

    Ok(pieces)
}

/// How a transition decides whether it accepts a path segment. Simple shapes
/// avoid the regex engine entirely.
#[derive(Debug, Clone)]
pub(crate) enum SegmentMatcher {
    Unconditional,
    Literal(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
    Regex(regex::Regex),
}

impl SegmentMatcher {
    pub(crate) fn new(tokens: &[Token]) -> Result<Self, InvalidPatternError> {
        // Runs of stars are equivalent to a single star
        let mut collapsed: Vec<Token> = Vec::with_capacity(tokens.len());
        for &token in tokens {
            if token == Token::Star && collapsed.last() == Some(&Token::Star) {
                continue;
            }
            collapsed.push(token);
        }

        if collapsed == [Token::Star] {
            return Ok(Self::Unconditional);
        }

        let leading_star = collapsed.first() == Some(&Token::Star);
        let trailing_star = collapsed.last() == Some(&Token::Star);
        let inner = &collapsed[usize::from(leading_star)..collapsed.len() - usize::from(trailing_star)];
        let inner_literal: Option<String> = inner
            .iter()
            .map(|t| match t {
                Token::Literal(c) => Some(*c),
                _ => None,
            })
            .collect();

        Ok(match (leading_star, trailing_star, inner_literal) {
            (false, false, Some(text)) => Self::Literal(text),
            (false, true, Some(text)) => Self::Prefix(text),
            (true, false, Some(text)) => Self::Suffix(text),
            (true, true, Some(text)) => Self::Contains(text),
            _ => Self::Regex(tokens_to_regex(&collapsed)?),
        })
    }

    pub(crate) fn is_match(&self, candidate: &str) -> bool {
        match self {
            Self::Unconditional => true,
            Self::Literal(text) => text == candidate,
            Self::Prefix(text) => candidate.starts_with(text.as_str()),
            Self::Suffix(text) => candidate.ends_with(text.as_str()),
            Self::Contains(text) => {
                memchr::memmem::find(candidate.as_bytes(), text.as_bytes()).is_some()
            }
            Self::Regex(re) => re.is_match(candidate),
        }
    }
}

fn tokens_to_regex(tokens: &[Token]) -> Result<regex::Regex, InvalidPatternError> {
    let mut regex = String::with_capacity(tokens.len() + 8);
    regex.push_str(r#"\A"#);
    for token in tokens {
        match *token {
            Token::Star => regex.push_str(r#"[^/]*"#),
            Token::Question => regex.push_str(r#"[^/]"#),
            Token::Literal(c) => {
                if regex_syntax::is_meta_character(c) {
                    regex.push('\\');
                }
                regex.push(c);
            }
        }
    }
    regex.push_str(r#"\z"#);
    regex::Regex::new(&regex).map_err(|err| InvalidPatternError::InvalidSegment {
        segment: regex,
        reason: err.to_string(),
    })
}
