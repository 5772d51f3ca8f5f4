use thiserror::Error;

/// Caller mistakes: malformed configuration or input
///
/// Constraints that simply cannot be met are not errors; they come back as
/// [`Plan::Infeasible`](super::Plan::Infeasible).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid token at index {index}: {token:?} (tokens must be non-empty and contain no whitespace)")]
    InvalidToken { index: usize, token: String },

    #[error("Invalid entity {name:?}: span {start}..{end} is empty or outside a {len}-byte document")]
    InvalidEntity {
        name: String,
        start: usize,
        end: usize,
        len: usize,
    },
}
