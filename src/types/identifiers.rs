use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of an abbreviation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbbreviationId(u64);

/// Stable identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifiers start at 1, got 0")]
    Zero,
}

impl AbbreviationId {
    pub fn new(raw: u64) -> Self {
        AbbreviationId(raw)
    }

    /// Identifier taken from untrusted input; zero is never issued by a store.
    pub fn parse(raw: u64) -> Result<Self, IdentifierError> {
        if raw == 0 {
            return Err(IdentifierError::Zero);
        }
        Ok(AbbreviationId(raw))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl UserId {
    pub fn new(raw: u64) -> Self {
        UserId(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for AbbreviationId {
    fn from(raw: u64) -> Self {
        AbbreviationId(raw)
    }
}

impl From<u64> for UserId {
    fn from(raw: u64) -> Self {
        UserId(raw)
    }
}

impl fmt::Display for AbbreviationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
