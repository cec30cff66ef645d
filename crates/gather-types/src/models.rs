use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A votable activity. Names are stored lowercase and are unique regardless of case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interest {
    pub id: Uuid,
    pub name: String,
    pub inside: bool,
    pub outside: bool,
    pub free: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A user as seen through a group's membership list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub group_id: Uuid,
    pub end_date: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// An interest seeded for an event, with its running ballot weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotableInterest {
    #[serde(flatten)]
    pub interest: Interest,
    pub votes_count: i64,
}

/// Per-member participation state for one event.
///
/// Moves once from `NotVoted` to either `Voted` or `OptOut` and stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoteStatus {
    NotVoted,
    Voted,
    OptOut,
}

impl VoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotVoted => "not-voted",
            Self::Voted => "voted",
            Self::OptOut => "opt-out",
        }
    }

    /// Whether the member no longer holds the event open.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::NotVoted)
    }
}

impl fmt::Display for VoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown vote status: {0}")]
pub struct ParseVoteStatusError(pub String);

impl FromStr for VoteStatus {
    type Err = ParseVoteStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-voted" => Ok(Self::NotVoted),
            "voted" => Ok(Self::Voted),
            "opt-out" => Ok(Self::OptOut),
            other => Err(ParseVoteStatusError(other.to_string())),
        }
    }
}
