// Public API exports
pub mod chunker;
pub mod document;
pub mod entity;

// Re-export main types for convenience
pub use document::Document;
pub use entity::{Entity, Span, SpanLocator};

pub use chunker::{
    plan_chunks, Chunk, ChunkConfig, ChunkError, Chunker, ChunkerBuilder, Delimiters, Infeasible,
    Plan, RelevanceSource, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MIN_PADDING,
};

/// Find every occurrence of each name in `sequence`, overlapping hits included
///
/// Positions are UTF-8 byte offsets. Use [`SpanLocator::locate_tokens`] to
/// search a token list instead.
pub fn locate_entities<N: AsRef<str>>(sequence: &str, names: &[N]) -> Vec<Entity> {
    SpanLocator::new().locate(sequence, names)
}
