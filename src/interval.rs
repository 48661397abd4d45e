//! Owner-tagged spans.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a collaborator.
///
/// An empty id stands for "no known author"; claims carrying one are rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id names an actual collaborator.
    pub fn is_defined(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OwnerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Half-open span `[start, end)` last written by `owner`.
///
/// Stored intervals always satisfy `start < end`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AuthorshipInterval {
    pub start: usize,
    pub end: usize,
    pub owner: OwnerId,
}

impl AuthorshipInterval {
    pub fn new(start: usize, end: usize, owner: impl Into<OwnerId>) -> Self {
        Self {
            start,
            end,
            owner: owner.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether the two spans share at least one position.
    ///
    /// Spans that merely touch (`self.end == other.start`) do not overlap.
    pub fn overlaps(&self, other: &AuthorshipInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}
