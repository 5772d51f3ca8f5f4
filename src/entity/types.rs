use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Half-open `[start, end)` interval over some offset space
///
/// The space is whatever the producer searched: UTF-8 byte offsets of a
/// document text, or token indices of a word list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// True if `other` lies entirely inside this span
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.start <= other.end && other.end <= self.end
    }

    /// True if the two spans share at least one offset
    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A named, located span of interest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Literal text the entity was located by (e.g. "[abdominal pain]")
    pub name: String,
    /// Where the entity sits in the searched sequence
    pub position: Span,
}

impl Entity {
    pub fn new(name: impl Into<String>, position: impl Into<Span>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
        }
    }

    /// Number of whitespace-separated words in the entity name
    pub fn word_count(&self) -> usize {
        self.name.split_whitespace().count()
    }
}
