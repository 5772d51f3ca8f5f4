use super::{Chunk, ChunkWindow, Infeasible};
use crate::document::Document;
use crate::entity::{Entity, Span, SpanLocator};

/// Turn validated token windows into document spans with their entities
///
/// Each window's text is rebuilt from its tokens and located in the document
/// text. Repeated phrases can match in several places, so the search is
/// confined to the window's own byte range and only a hit starting at the
/// window's first token is accepted.
pub fn materialize(
    windows: &[ChunkWindow],
    entities: &[Entity],
    document: &Document,
) -> Result<Vec<Chunk>, Infeasible> {
    let locator = SpanLocator::new();

    windows
        .iter()
        .map(|&window| {
            let unlocatable = Infeasible::Unlocatable { window };

            let text = document
                .join_window(window)
                .ok_or_else(|| unlocatable.clone())?;
            let expected = document
                .byte_span(window)
                .ok_or_else(|| unlocatable.clone())?;

            // Only the window's own byte range is searched, so a hit must start at 0
            let haystack = document
                .text()
                .get(expected.start..expected.end)
                .ok_or_else(|| unlocatable.clone())?;
            let position = locator
                .locate(haystack, &[text.as_str()])
                .into_iter()
                .find(|hit| hit.position.start == 0)
                .map(|hit| Span::new(expected.start, expected.start + hit.position.len()))
                .filter(|position| *position == expected)
                .ok_or(unlocatable)?;

            let contained = entities
                .iter()
                .filter(|entity| position.contains(&entity.position))
                .cloned()
                .collect();

            Ok(Chunk {
                position,
                entities: contained,
            })
        })
        .collect()
}
