use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::InvalidOwnerError;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,6}\z").expect("valid email regex")
});
static TEAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A@[A-Za-z0-9\-]+/[A-Za-z0-9_\-]+\z").expect("valid team regex"));
static USER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A@[A-Za-z0-9\-]+\z").expect("valid user regex"));

/// The three shapes an owner token can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    Email,
    Team,
    User,
}

/// A normalized owner token. `value` is stored without the leading `@` for
/// teams and users, and is rendered back with it by `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Owner {
    value: String,
    kind: OwnerKind,
}

impl Owner {
    pub fn new(value: impl Into<String>, kind: OwnerKind) -> Owner {
        let value = value.into();
        let value = match kind {
            OwnerKind::Email => value,
            OwnerKind::Team | OwnerKind::User => match value.strip_prefix('@') {
                Some(stripped) => stripped.to_owned(),
                None => value,
            },
        };
        Owner { value, kind }
    }

    /// Classify a raw token. Email is tried first, then team, then user.
    pub fn classify(token: &str) -> Result<Owner, InvalidOwnerError> {
        let kind = if EMAIL.is_match(token) {
            OwnerKind::Email
        } else if TEAM.is_match(token) {
            OwnerKind::Team
        } else if USER.is_match(token) {
            OwnerKind::User
        } else {
            return Err(InvalidOwnerError {
                owner: token.to_owned(),
                column: 1,
            });
        };
        Ok(Owner::new(token, kind))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> OwnerKind {
        self.kind
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OwnerKind::Email => f.write_str(&self.value),
            OwnerKind::Team | OwnerKind::User => write!(f, "@{}", self.value),
        }
    }
}

impl FromStr for Owner {
    type Err = InvalidOwnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Owner::classify(s)
    }
}

impl TryFrom<String> for Owner {
    type Error = InvalidOwnerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Owner::classify(&s)
    }
}

impl Serialize for Owner {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
