use crate::document::Document;
use crate::entity::{Entity, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Half-open range of token indices chosen by the planner
pub type ChunkWindow = Span;

/// A bounded window of the document holding one or more entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Byte span in the document text
    pub position: Span,
    /// Entities fully contained in `position`
    pub entities: Vec<Entity>,
}

impl Chunk {
    /// The chunk's slice of the document text
    pub fn text<'a>(&self, document: &'a Document) -> &'a str {
        document
            .text()
            .get(self.position.start..self.position.end)
            .unwrap_or_default()
    }
}

/// Outcome of one planning call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum Plan {
    /// Successful chunking; empty when the input holds no entities
    Chunked(Vec<Chunk>),
    /// Entities exist but the size/padding constraints cannot all hold
    Infeasible(Infeasible),
}

impl Plan {
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Plan::Infeasible(_))
    }

    pub fn chunks(&self) -> Option<&[Chunk]> {
        match self {
            Plan::Chunked(chunks) => Some(chunks),
            Plan::Infeasible(_) => None,
        }
    }

    pub fn into_chunks(self) -> Option<Vec<Chunk>> {
        match self {
            Plan::Chunked(chunks) => Some(chunks),
            Plan::Infeasible(_) => None,
        }
    }
}

/// Why no valid chunking exists
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Infeasible {
    #[error("entity {name:?} spans {words} words but a chunk holds at most {max_chunk_size}")]
    EntityTooLarge {
        name: String,
        words: usize,
        max_chunk_size: usize,
    },

    #[error("scan stalled at token {index}: padding does not fit inside the chunk size")]
    Stalled { index: usize },

    #[error("plan rejected: {0}")]
    Rejected(Violation),

    #[error("window {}..{} could not be located in the document", .window.start, .window.end)]
    Unlocatable { window: ChunkWindow },
}

/// A window that broke one of the chunking rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub window: ChunkWindow,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Oversized { len: usize, max: usize },
    OutOfBounds { tokens: usize },
    NoRelevantToken,
    LeadingPadding { found: usize, required: usize },
    TrailingPadding { found: usize, required: usize },
    SplitsEntity { name: String },
    UnbalancedDelimiters { open: usize, close: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window {}..{} ", self.window.start, self.window.end)?;
        match &self.kind {
            ViolationKind::Oversized { len, max } => {
                write!(f, "holds {} tokens (max {})", len, max)
            }
            ViolationKind::OutOfBounds { tokens } => {
                write!(f, "runs past the last of {} tokens", tokens)
            }
            ViolationKind::NoRelevantToken => write!(f, "contains no entity token"),
            ViolationKind::LeadingPadding { found, required } => {
                write!(f, "has {} leading context tokens (need {})", found, required)
            }
            ViolationKind::TrailingPadding { found, required } => {
                write!(f, "has {} trailing context tokens (need {})", found, required)
            }
            ViolationKind::SplitsEntity { name } => write!(f, "cuts through entity {:?}", name),
            ViolationKind::UnbalancedDelimiters { open, close } => {
                write!(f, "has {} opening but {} closing delimiters", open, close)
            }
        }
    }
}
