//! Property-Based Tests
//!
//! Random documents of plain words and bracketed entities, chunked under random
//! limits. Whenever a plan succeeds it must honour every chunking rule.

use entity_chunker::chunker::RelevanceMask;
use entity_chunker::{Chunker, Document, Entity, Plan, SpanLocator};
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Segment {
    Word(String),
    Entity(Vec<String>),
}

fn segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        3 => "[a-z]{1,6}".prop_map(Segment::Word),
        1 => prop::collection::vec("[a-z]{1,6}", 1..=3).prop_map(Segment::Entity),
    ]
}

/// Marked tokens plus the distinct bracketed entity names they contain
fn build(segments: &[Segment]) -> (Vec<String>, Vec<String>) {
    let mut words = Vec::new();
    let mut names = BTreeSet::new();

    for segment in segments {
        match segment {
            Segment::Word(word) => words.push(word.clone()),
            Segment::Entity(parts) => {
                names.insert(format!("[{}]", parts.join(" ")));
                let last = parts.len() - 1;
                for (i, part) in parts.iter().enumerate() {
                    let mut token = part.clone();
                    if i == 0 {
                        token.insert(0, '[');
                    }
                    if i == last {
                        token.push(']');
                    }
                    words.push(token);
                }
            }
        }
    }

    (words, names.into_iter().collect())
}

fn run(
    segments: &[Segment],
    max_chunk_size: usize,
    min_padding: usize,
) -> (Document, Vec<Entity>, Plan) {
    let (words, names) = build(segments);
    let document = Document::from_words(&words).unwrap();
    let entities = SpanLocator::new().locate(document.text(), &names);
    let chunker = Chunker::builder()
        .max_chunk_size(max_chunk_size)
        .min_padding(min_padding)
        .build()
        .unwrap();
    let plan = chunker.plan(&document, &entities).unwrap();
    (document, entities, plan)
}

// ============================================================================
// Size and containment
// ============================================================================

/// Property: chunks never exceed the size limit and start in increasing order
#[test]
fn proptest_chunks_bounded_and_ordered() {
    proptest!(|(segments in prop::collection::vec(segment(), 0..30), max in 1usize..10, padding in 0usize..4)| {
        let (document, _, plan) = run(&segments, max, padding);

        if let Plan::Chunked(chunks) = plan {
            for chunk in &chunks {
                let tokens = document.token_range(chunk.position);
                prop_assert!(!tokens.is_empty());
                prop_assert!(tokens.len() <= max, "chunk of {} tokens, max {}", tokens.len(), max);
            }
            for pair in chunks.windows(2) {
                prop_assert!(pair[0].position.start < pair[1].position.start);
            }
        }
    });
}

/// Property: every entity sits whole in exactly one chunk, and no chunk cuts one
#[test]
fn proptest_entities_never_split() {
    proptest!(|(segments in prop::collection::vec(segment(), 0..30), max in 1usize..10, padding in 0usize..4)| {
        let (_, entities, plan) = run(&segments, max, padding);

        if let Plan::Chunked(chunks) = plan {
            for entity in &entities {
                let holders = chunks
                    .iter()
                    .filter(|chunk| chunk.entities.contains(entity))
                    .count();
                prop_assert_eq!(holders, 1, "entity {:?}", entity);

                for chunk in &chunks {
                    let p = &chunk.position;
                    prop_assert!(p.contains(&entity.position) || !p.intersects(&entity.position));
                }
            }
        }
    });
}

/// Property: padding holds on each side unless the chunk touches the edge
#[test]
fn proptest_padding_respected() {
    proptest!(|(segments in prop::collection::vec(segment(), 0..30), max in 1usize..10, padding in 0usize..4)| {
        let (document, entities, plan) = run(&segments, max, padding);
        let mask = RelevanceMask::from_entities(&document, &entities);

        if let Plan::Chunked(chunks) = plan {
            for chunk in &chunks {
                let window = document.token_range(chunk.position);
                let (leading, trailing) = mask.padding(window).unwrap();
                if window.start > 0 {
                    prop_assert!(leading >= padding);
                }
                if window.end < document.len() {
                    prop_assert!(trailing >= padding);
                }
            }
        }
    });
}

// ============================================================================
// Outcomes
// ============================================================================

/// Property: an entity wider than a chunk always makes the plan infeasible
#[test]
fn proptest_oversized_entity_infeasible() {
    proptest!(|(segments in prop::collection::vec(segment(), 0..30), max in 1usize..4, padding in 0usize..3)| {
        let (_, entities, plan) = run(&segments, max, padding);

        if entities.iter().any(|e| e.word_count() > max) {
            prop_assert!(plan.is_infeasible());
        }
    });
}

/// Property: text without entities chunks to an empty list
#[test]
fn proptest_entity_free_is_empty() {
    proptest!(|(words in prop::collection::vec("[a-z]{1,6}", 0..30), max in 1usize..10, padding in 0usize..4)| {
        let segments: Vec<Segment> = words.into_iter().map(Segment::Word).collect();
        let (_, _, plan) = run(&segments, max, padding);

        prop_assert_eq!(plan, Plan::Chunked(vec![]));
    });
}

/// Property: identical input, identical plan
#[test]
fn proptest_deterministic() {
    proptest!(|(segments in prop::collection::vec(segment(), 0..30), max in 1usize..10, padding in 0usize..4)| {
        let (_, _, first) = run(&segments, max, padding);
        let (_, _, second) = run(&segments, max, padding);

        prop_assert_eq!(first, second);
    });
}
