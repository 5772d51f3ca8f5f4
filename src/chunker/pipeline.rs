use super::{
    materializer, planner, ChunkConfig, ChunkError, Delimiters, Infeasible, Plan, RelevanceMask,
    RelevanceSource, WindowValidator,
};
use crate::document::Document;
use crate::entity::{Entity, Span};
use tracing::{debug, debug_span};

/// Configured plan -> validate -> materialize pipeline
///
/// Holds no state between calls, so one chunker can serve any number of
/// documents, from any number of threads.
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkConfig,
}

/// Builder for a [`Chunker`]; the config is checked in [`build`](Self::build)
#[derive(Debug, Clone, Default)]
pub struct ChunkerBuilder {
    config: ChunkConfig,
}

impl ChunkerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing config (e.g. one loaded from JSON)
    pub fn config(mut self, config: ChunkConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_chunk_size(mut self, size: usize) -> Self {
        self.config.max_chunk_size = size;
        self
    }

    pub fn min_padding(mut self, padding: usize) -> Self {
        self.config.min_padding = padding;
        self
    }

    pub fn relevance(mut self, source: RelevanceSource) -> Self {
        self.config.relevance = source;
        self
    }

    pub fn delimiters(mut self, open: char, close: char) -> Self {
        self.config.delimiters = Delimiters { open, close };
        self
    }

    pub fn build(self) -> Result<Chunker, ChunkError> {
        Chunker::new(self.config)
    }
}

impl Chunker {
    pub fn new(config: ChunkConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn builder() -> ChunkerBuilder {
        ChunkerBuilder::new()
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Chunk `document` so every entity lands whole in exactly one chunk
    ///
    /// Entity positions are byte offsets into `document.text()`.
    ///
    /// # Returns
    /// - `Ok(Plan::Chunked(chunks))`, empty when nothing is relevant
    /// - `Ok(Plan::Infeasible(reason))` when the limits cannot all hold
    /// - `Err(_)` for entities outside the document
    pub fn plan(&self, document: &Document, entities: &[Entity]) -> Result<Plan, ChunkError> {
        let ChunkConfig {
            max_chunk_size,
            min_padding,
            relevance,
            delimiters,
        } = self.config;

        let _span = debug_span!(
            "plan_chunks",
            tokens = document.len(),
            entities = entities.len(),
            max_chunk_size,
            min_padding
        )
        .entered();

        let entity_tokens = self.entity_tokens(document, entities)?;

        if let Some(reason) = self.oversized_entity(&entity_tokens, entities) {
            debug!(%reason, "entity cannot fit any chunk");
            return Ok(Plan::Infeasible(reason));
        }

        let mask = match relevance {
            RelevanceSource::Entities => RelevanceMask::from_entities(document, entities),
            RelevanceSource::Delimiters => RelevanceMask::from_delimiters(document, &delimiters),
        };
        debug!(relevant = mask.relevant_count(), ?relevance, "relevance derived");

        let mut validator = WindowValidator::new(&mask, document, max_chunk_size, min_padding)
            .entities(entity_tokens);
        if relevance == RelevanceSource::Delimiters {
            validator = validator.delimiters(delimiters);
        }

        let outcome = planner::plan(&mask, max_chunk_size, min_padding)
            .and_then(|windows| validator.validate(windows))
            .and_then(|windows| materializer::materialize(&windows, entities, document));

        Ok(match outcome {
            Ok(chunks) => {
                debug!(chunks = chunks.len(), "chunking succeeded");
                Plan::Chunked(chunks)
            }
            Err(reason) => {
                debug!(%reason, "chunking infeasible");
                Plan::Infeasible(reason)
            }
        })
    }

    /// Token range of every entity, rejecting spans that do not fit the text
    fn entity_tokens<'a>(
        &self,
        document: &Document,
        entities: &'a [Entity],
    ) -> Result<Vec<(&'a str, Span)>, ChunkError> {
        let len = document.text().len();

        entities
            .iter()
            .map(|entity| {
                let position = entity.position;
                if position.is_empty() || position.end > len {
                    return Err(ChunkError::InvalidEntity {
                        name: entity.name.clone(),
                        start: position.start,
                        end: position.end,
                        len,
                    });
                }
                Ok((entity.name.as_str(), document.token_range(position)))
            })
            .collect()
    }

    /// First entity longer than a whole chunk, by name words or covered tokens
    fn oversized_entity(
        &self,
        entity_tokens: &[(&str, Span)],
        entities: &[Entity],
    ) -> Option<Infeasible> {
        let max_chunk_size = self.config.max_chunk_size;

        entities
            .iter()
            .zip(entity_tokens)
            .map(|(entity, (_, tokens))| (entity, entity.word_count().max(tokens.len())))
            .find(|(_, words)| *words > max_chunk_size)
            .map(|(entity, words)| Infeasible::EntityTooLarge {
                name: entity.name.clone(),
                words,
                max_chunk_size,
            })
    }
}

/// Chunk a token list with the default relevance rules
///
/// Relevance is derived from the entity spans, so a token counts as relevant
/// when it overlaps an entity. The per-chunk delimiter-balance check is
/// skipped; build a [`Chunker`] with [`RelevanceSource::Delimiters`] to get
/// the bracket-based rule and that check.
///
/// `entities` must be located in the single-space join of `words`, e.g. via
/// [`locate_entities`](crate::locate_entities) on
/// [`Document::text`](crate::Document::text).
pub fn plan_chunks<W: AsRef<str>>(
    words: &[W],
    entities: &[Entity],
    max_chunk_size: usize,
    min_padding: usize,
) -> Result<Plan, ChunkError> {
    let document = Document::from_words(words)?;
    let chunker = Chunker::builder()
        .max_chunk_size(max_chunk_size)
        .min_padding(min_padding)
        .build()?;
    chunker.plan(&document, entities)
}
