mod config;
mod error;
pub mod materializer;
mod pipeline;
mod plan;
pub mod planner;
mod relevance;
mod validator;


pub use config::{
    ChunkConfig, Delimiters, RelevanceSource, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MIN_PADDING,
};
pub use error::ChunkError;
pub use pipeline::{plan_chunks, Chunker, ChunkerBuilder};
pub use plan::{Chunk, ChunkWindow, Infeasible, Plan, Violation, ViolationKind};
pub use relevance::RelevanceMask;
pub use validator::WindowValidator;
