//! Message types
//!
//! - [`RowChange`]: a before/after snapshot delivered by the change feed
//! - [`Notice`]: a transient, fire-and-forget message for the user

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod notice;
pub use notice::*;

/// Kind of row mutation reported by the change feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Insert => write!(f, "INSERT"),
            ChangeKind::Update => write!(f, "UPDATE"),
            ChangeKind::Delete => write!(f, "DELETE"),
        }
    }
}

/// A row mutation with the previous and new snapshots.
///
/// Inserts carry only `new`, deletes only `old`, updates both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowChange<T> {
    pub kind: ChangeKind,
    pub old: Option<T>,
    pub new: Option<T>,
}

impl<T> RowChange<T> {
    pub fn insert(new: T) -> Self {
        Self {
            kind: ChangeKind::Insert,
            old: None,
            new: Some(new),
        }
    }

    pub fn update(old: T, new: T) -> Self {
        Self {
            kind: ChangeKind::Update,
            old: Some(old),
            new: Some(new),
        }
    }

    pub fn delete(old: T) -> Self {
        Self {
            kind: ChangeKind::Delete,
            old: Some(old),
            new: None,
        }
    }

    /// Both snapshots of an update, `None` for any other kind
    pub fn as_update(&self) -> Option<(&T, &T)> {
        match (self.kind, &self.old, &self.new) {
            (ChangeKind::Update, Some(old), Some(new)) => Some((old, new)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_update_only_for_updates() {
        assert_eq!(RowChange::update(1, 2).as_update(), Some((&1, &2)));
        assert_eq!(RowChange::insert(2).as_update(), None);
        assert_eq!(RowChange::delete(1).as_update(), None);
    }

    #[test]
    fn test_kind_wire_name() {
        let json = serde_json::to_string(&RowChange::update("a", "b")).unwrap();
        assert!(json.contains("\"kind\":\"UPDATE\""));
    }
}
