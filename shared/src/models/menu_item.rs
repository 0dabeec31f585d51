//! Menu Item Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::vote::VoteDirection;
use crate::error::{AppError, ErrorCode};

/// Menu item entity (`menu_items` table)
///
/// Only `votes` and the `last_vote_*` provenance columns are ever written by
/// the client; everything else is read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    /// Category label; a NULL column reads as an empty label
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    pub is_nonveg: bool,
    /// Running vote total, NULL until the first vote
    #[serde(default)]
    pub votes: Option<i64>,
    /// Owning canteen reference
    #[serde(rename = "canteenid")]
    pub canteen_id: String,
    #[serde(default, rename = "arihants_rating")]
    pub curator_rating: Option<CuratorRating>,
    #[serde(default)]
    pub last_voter: Option<String>,
    #[serde(default)]
    pub last_vote_type: Option<VoteDirection>,
    #[serde(default)]
    pub last_vote_timestamp: Option<DateTime<Utc>>,
}

impl MenuItem {
    /// Vote total with NULL read as zero
    #[inline]
    pub fn vote_count(&self) -> i64 {
        self.votes.unwrap_or(0)
    }

    #[inline]
    pub fn is_veg(&self) -> bool {
        !self.is_nonveg
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Curator's verdict on an item, stored as 0/1/2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum CuratorRating {
    Unfavorable = 0,
    Neutral = 1,
    Favorable = 2,
}

impl CuratorRating {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unfavorable => "not recommended",
            Self::Neutral => "okay",
            Self::Favorable => "recommended",
        }
    }
}

impl From<CuratorRating> for i32 {
    fn from(rating: CuratorRating) -> Self {
        rating as i32
    }
}

impl TryFrom<i32> for CuratorRating {
    type Error = AppError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unfavorable),
            1 => Ok(Self::Neutral),
            2 => Ok(Self::Favorable),
            other => Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("curator rating out of range: {}", other),
            )),
        }
    }
}

/// Distinct, non-empty category labels in first-seen order
pub fn distinct_categories<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    labels
        .into_iter()
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(*label))
        .map(String::from)
        .collect()
}
