use crate::chunker::ChunkError;
use crate::entity::Span;

/// A token sequence together with its canonical text
///
/// The text is the tokens joined by single spaces. Entity positions, relevance
/// derivation and chunk positions all use UTF-8 byte offsets into this text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    /// Byte span of every token inside `text`
    spans: Vec<Span>,
}

impl Document {
    /// Build a document from already tokenized words
    ///
    /// Tokens must be non-empty and free of whitespace, otherwise the joined
    /// text could not be split back into the same tokens.
    pub fn from_words<W: AsRef<str>>(words: &[W]) -> Result<Self, ChunkError> {
        for (index, word) in words.iter().enumerate() {
            let word = word.as_ref();
            if word.is_empty() || word.chars().any(char::is_whitespace) {
                return Err(ChunkError::InvalidToken {
                    index,
                    token: word.to_string(),
                });
            }
        }

        Ok(Self::join(words.iter().map(|word| word.as_ref())))
    }

    /// Split raw text on whitespace and build a document from the pieces
    pub fn from_text(text: &str) -> Self {
        Self::join(text.split_whitespace())
    }

    fn join<'a>(words: impl Iterator<Item = &'a str>) -> Self {
        let mut text = String::new();
        let mut spans = Vec::new();

        for word in words {
            if !text.is_empty() {
                text.push(' ');
            }
            let start = text.len();
            text.push_str(word);
            spans.push(Span::new(start, text.len()));
        }

        Self { text, spans }
    }

    /// The canonical single-space joined text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.spans.get(index).map(|span| &self.text[span.start..span.end])
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans.iter().map(|span| &self.text[span.start..span.end])
    }

    /// Byte span of each token
    pub fn token_spans(&self) -> &[Span] {
        &self.spans
    }

    /// Byte span covered by a window of tokens
    ///
    /// Returns `None` for empty windows or windows past the last token.
    pub fn byte_span(&self, window: Span) -> Option<Span> {
        if window.is_empty() || window.end > self.spans.len() {
            return None;
        }
        let first = self.spans[window.start];
        let last = self.spans[window.end - 1];
        Some(Span::new(first.start, last.end))
    }

    /// Tokens of a window joined with single spaces
    pub fn join_window(&self, window: Span) -> Option<String> {
        if window.is_empty() || window.end > self.spans.len() {
            return None;
        }
        let words: Vec<&str> = self.spans[window.start..window.end]
            .iter()
            .map(|span| &self.text[span.start..span.end])
            .collect();
        Some(words.join(" "))
    }

    /// Range of token indices whose bytes intersect `span`
    ///
    /// The range is empty when `span` only covers separators or lies outside
    /// the text.
    pub fn token_range(&self, span: Span) -> Span {
        let first = self.spans.partition_point(|token| token.end <= span.start);
        let last = self.spans.partition_point(|token| token.start < span.end);
        Span::new(first, last.max(first))
    }
}
