use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any failure surfaced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A rule file could not be parsed. `line` is 1-based.
    #[error("line {line}: {error}")]
    Parse {
        line: usize,
        error: SyntaxError,
    },

    #[error(transparent)]
    InvalidPattern(#[from] InvalidPatternError),

    #[error(transparent)]
    InvalidOwner(#[from] InvalidOwnerError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The reason a single rule line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Pattern(#[from] InvalidPatternError),

    #[error(transparent)]
    Owner(#[from] InvalidOwnerError),

    #[error("unexpected end of rule")]
    UnexpectedEnd,
}

/// A glob could not be compiled. Columns are 1-based and count characters,
/// not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("unexpected character '{character}' at column {column}")]
    UnexpectedCharacter { character: char, column: usize },

    #[error("unfinished escape at column {column}")]
    DanglingEscape { column: usize },

    #[error("invalid segment '{segment}': {reason}")]
    InvalidSegment { segment: String, reason: String },
}

impl InvalidPatternError {
    /// Rebase the reported column when the pattern started `offset`
    /// characters into a longer line.
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            Self::UnexpectedCharacter { character, column } => Self::UnexpectedCharacter {
                character,
                column: column + offset,
            },
            Self::DanglingEscape { column } => Self::DanglingEscape {
                column: column + offset,
            },
            other => other,
        }
    }
}

/// An owner token is not an email address, `@org/team` or `@username`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid owner format '{owner}' at column {column}")]
pub struct InvalidOwnerError {
    pub owner: String,
    pub column: usize,
}

impl InvalidOwnerError {
    pub fn shifted(self, offset: usize) -> Self {
        Self {
            column: self.column + offset,
            ..self
        }
    }
}

/// A compiled pattern could not be evaluated against a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot match path {path:?}: {reason}")]
pub struct MatchError {
    pub path: String,
    pub reason: &'static str,
}
