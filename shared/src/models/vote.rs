//! Vote protocol types
//!
//! An item carries a running vote total plus provenance of the most recent
//! vote (who, which way, when). There is no per-user tally: each accepted
//! vote overwrites the provenance, last write wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::menu_item::MenuItem;

/// Vote direction, stored as `liked` / `disliked`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteDirection {
    #[serde(rename = "liked")]
    Up,
    #[serde(rename = "disliked")]
    Down,
}

impl VoteDirection {
    /// Change applied to the running total
    pub const fn delta(&self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// Stored column value, also used in activity notices
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "liked",
            Self::Down => "disliked",
        }
    }

    /// Used in the voter's own confirmation notice
    pub const fn past_tense(&self) -> &'static str {
        match self {
            Self::Up => "upvoted",
            Self::Down => "downvoted",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The columns read before a vote is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteState {
    pub name: String,
    #[serde(default)]
    pub votes: Option<i64>,
    #[serde(default)]
    pub last_voter: Option<String>,
    #[serde(default)]
    pub last_vote_type: Option<VoteDirection>,
}

impl VoteState {
    /// Whether `voter` already cast the most recent vote in `direction`
    pub fn is_repeat(&self, voter: &str, direction: VoteDirection) -> bool {
        self.last_voter.as_deref() == Some(voter) && self.last_vote_type == Some(direction)
    }

    /// Decide what a vote by `voter` does to this state
    pub fn decide(&self, voter: &str, direction: VoteDirection, at: DateTime<Utc>) -> VoteDecision {
        if self.is_repeat(voter, direction) {
            return VoteDecision::Suppressed;
        }
        VoteDecision::Apply(VoteUpdate {
            votes: self.votes.unwrap_or(0) + direction.delta(),
            last_voter: voter.to_string(),
            last_vote_type: direction,
            last_vote_timestamp: at,
        })
    }
}

impl From<&MenuItem> for VoteState {
    fn from(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            votes: item.votes,
            last_voter: item.last_voter.clone(),
            last_vote_type: item.last_vote_type,
        }
    }
}

/// Outcome of [`VoteState::decide`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteDecision {
    /// Same voter, same direction as last time: nothing to write
    Suppressed,
    Apply(VoteUpdate),
}

/// Update payload written to the item row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteUpdate {
    pub votes: i64,
    pub last_voter: String,
    pub last_vote_type: VoteDirection,
    pub last_vote_timestamp: DateTime<Utc>,
}

impl VoteUpdate {
    /// Apply this update to an in-memory row
    pub fn apply_to(&self, item: &mut MenuItem) {
        item.votes = Some(self.votes);
        item.last_voter = Some(self.last_voter.clone());
        item.last_vote_type = Some(self.last_vote_type);
        item.last_vote_timestamp = Some(self.last_vote_timestamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(votes: Option<i64>, voter: Option<&str>, dir: Option<VoteDirection>) -> VoteState {
        VoteState {
            name: "Masala Dosa".into(),
            votes,
            last_voter: voter.map(String::from),
            last_vote_type: dir,
        }
    }

    #[test]
    fn test_same_voter_same_direction_is_suppressed() {
        let s = state(Some(4), Some("Alice"), Some(VoteDirection::Up));
        assert_eq!(
            s.decide("Alice", VoteDirection::Up, Utc::now()),
            VoteDecision::Suppressed
        );
    }

    #[test]
    fn test_direction_switch_is_applied() {
        let at = Utc::now();
        let s = state(Some(4), Some("Alice"), Some(VoteDirection::Up));
        let VoteDecision::Apply(update) = s.decide("Alice", VoteDirection::Down, at) else {
            panic!("direction switch must be applied");
        };
        assert_eq!(update.votes, 3);
        assert_eq!(update.last_vote_type, VoteDirection::Down);
        assert_eq!(update.last_voter, "Alice");
        assert_eq!(update.last_vote_timestamp, at);
    }

    #[test]
    fn test_other_voter_same_direction_is_applied() {
        let s = state(Some(4), Some("Alice"), Some(VoteDirection::Up));
        let VoteDecision::Apply(update) = s.decide("Bob", VoteDirection::Up, Utc::now()) else {
            panic!("another voter must be applied");
        };
        assert_eq!(update.votes, 5);
        assert_eq!(update.last_voter, "Bob");
    }

    #[test]
    fn test_null_votes_start_from_zero() {
        let s = state(None, None, None);
        let VoteDecision::Apply(update) = s.decide("Alice", VoteDirection::Down, Utc::now()) else {
            panic!("first vote must be applied");
        };
        assert_eq!(update.votes, -1);
    }

    #[test]
    fn test_direction_wire_names() {
        assert_eq!(serde_json::to_string(&VoteDirection::Up).unwrap(), "\"liked\"");
        let down: VoteDirection = serde_json::from_str("\"disliked\"").unwrap();
        assert_eq!(down, VoteDirection::Down);
        assert_eq!(down.past_tense(), "downvoted");
    }
}
