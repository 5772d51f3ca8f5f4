use super::{ChunkWindow, Delimiters};
use crate::document::Document;
use crate::entity::Entity;

/// Per-token flag: does this token take part in an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevanceMask {
    flags: Vec<bool>,
}

impl RelevanceMask {
    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    /// Mark every token whose bytes intersect an entity span
    pub fn from_entities(document: &Document, entities: &[Entity]) -> Self {
        let mut flags = vec![false; document.len()];

        for entity in entities {
            let tokens = document.token_range(entity.position);
            for flag in &mut flags[tokens.start..tokens.end] {
                *flag = true;
            }
        }

        Self { flags }
    }

    /// Mark every token carrying an entity delimiter
    ///
    /// Relies on the caller having bracketed each mention in the token text.
    pub fn from_delimiters(document: &Document, delimiters: &Delimiters) -> Self {
        let flags = document.words().map(|word| delimiters.marks(word)).collect();
        Self { flags }
    }

    /// Number of tokens covered
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn is_relevant(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// True if any token is relevant
    pub fn any(&self) -> bool {
        self.flags.contains(&true)
    }

    pub fn relevant_count(&self) -> usize {
        self.flags.iter().filter(|&&flag| flag).count()
    }

    /// Non-relevant tokens before the first and after the last relevant token
    /// of `window`
    ///
    /// `None` if the window holds no relevant token or runs past the mask.
    pub fn padding(&self, window: ChunkWindow) -> Option<(usize, usize)> {
        let slice = self.flags.get(window.start..window.end)?;
        let leading = slice.iter().position(|&flag| flag)?;
        let trailing = slice.iter().rev().position(|&flag| flag)?;
        Some((leading, trailing))
    }
}

#[cfg(test)]
mod relevance_tests {
    use super::*;
    use crate::entity::{Span, SpanLocator};

    #[test]
    fn test_from_delimiters() {
        let doc = Document::from_text("He reported [abdominal pain] and [fever].");
        let mask = RelevanceMask::from_delimiters(&doc, &Delimiters::default());

        let flags: Vec<usize> = (0..mask.len()).filter(|&i| mask.is_relevant(i)).collect();
        assert_eq!(flags, vec![2, 3, 5]);
    }

    #[test]
    fn test_from_entities_matches_delimiters_on_marked_text() {
        let doc = Document::from_text(
            "Yesterday she had [abdominal pain] and [fever] for an hour. [Vomiting] was not present.",
        );
        let entities =
            SpanLocator::new().locate(doc.text(), &["[abdominal pain]", "[fever]", "[Vomiting]"]);

        let by_entities = RelevanceMask::from_entities(&doc, &entities);
        let by_delimiters = RelevanceMask::from_delimiters(&doc, &Delimiters::default());

        assert_eq!(by_entities, by_delimiters);
        assert_eq!(by_entities.relevant_count(), 4);
    }

    #[test]
    fn test_from_entities_without_markers() {
        let doc = Document::from_text("she had abdominal pain today");
        let entities = SpanLocator::new().locate(doc.text(), &["abdominal pain"]);

        let mask = RelevanceMask::from_entities(&doc, &entities);
        assert!(mask.is_relevant(2));
        assert!(mask.is_relevant(3));
        assert_eq!(mask.relevant_count(), 2);
    }

    #[test]
    fn test_padding() {
        let mask = RelevanceMask::from_flags(vec![false, false, true, true, false, true, false, false]);

        assert_eq!(mask.padding(Span::new(0, 8)), Some((2, 2)));
        assert_eq!(mask.padding(Span::new(3, 4)), Some((0, 0)));
        assert_eq!(mask.padding(Span::new(6, 8)), None);
        assert_eq!(mask.padding(Span::new(6, 9)), None);
    }

    #[test]
    fn test_out_of_range_is_not_relevant() {
        let mask = RelevanceMask::from_flags(vec![true]);
        assert!(mask.is_relevant(0));
        assert!(!mask.is_relevant(1));
        assert!(mask.any());
        assert!(!RelevanceMask::from_flags(vec![false, false]).any());
    }
}
