use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::identifiers::{AbbreviationId, UserId};

/// A user as embedded in a record: the owner of an abbreviation or the author
/// of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub user: UserId,
    pub value: VoteValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub user: UserSummary,
    pub content: String,
    pub created_at: NaiveDateTime,
}

/// The catalogued entity.
///
/// Records reach the export path fully loaded (owner, votes, comments) and are
/// never mutated by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abbreviation {
    pub id: AbbreviationId,
    pub abbreviation: String,
    pub meaning: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub user: UserSummary,
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Abbreviation {
    /// Up votes minus down votes.
    pub fn vote_score(&self) -> i64 {
        self.votes
            .iter()
            .map(|vote| match vote.value {
                VoteValue::Up => 1,
                VoteValue::Down => -1,
            })
            .sum()
    }
}
