use super::Entity;

/// Finds every literal occurrence of a list of names inside a sequence
///
/// Matching is exhaustive and overlapping: after a hit at offset `i` the next
/// search starts right after `i`, not after the end of the hit. Results are
/// grouped name by name in the order the names were given.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanLocator {
    case_insensitive: bool,
}

impl SpanLocator {
    /// Create a locator with exact, case-sensitive matching
    pub fn new() -> Self {
        Self::default()
    }

    /// Match ASCII letters regardless of case
    ///
    /// Only ASCII is folded, so byte offsets are identical to the exact case.
    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// Locate names inside a string; positions are UTF-8 byte offsets
    pub fn locate<N: AsRef<str>>(&self, text: &str, names: &[N]) -> Vec<Entity> {
        let mut entities = Vec::new();

        for name in names {
            let name = name.as_ref();
            if name.is_empty() {
                continue;
            }

            let mut from = 0;
            while let Some(start) = self.find_in_text(text, name, from) {
                entities.push(Entity::new(name, (start, start + name.len())));
                from = next_char_boundary(text, start);
            }
        }

        entities
    }

    /// Locate names inside a token list; positions are token indices
    ///
    /// Each name is split on whitespace and matched token by token, so
    /// `"abdominal pain"` matches the two consecutive tokens `abdominal`,
    /// `pain`.
    pub fn locate_tokens<W, N>(&self, words: &[W], names: &[N]) -> Vec<Entity>
    where
        W: AsRef<str>,
        N: AsRef<str>,
    {
        let mut entities = Vec::new();

        for name in names {
            let name = name.as_ref();
            let pattern: Vec<&str> = name.split_whitespace().collect();
            if pattern.is_empty() {
                continue;
            }

            let mut from = 0;
            while let Some(start) = self.find_in_tokens(words, &pattern, from) {
                entities.push(Entity::new(name, (start, start + pattern.len())));
                from = start + 1;
            }
        }

        entities
    }

    fn find_in_text(&self, text: &str, needle: &str, from: usize) -> Option<usize> {
        let haystack = text.get(from..)?;

        if self.case_insensitive {
            // The first byte of a needle is never a UTF-8 continuation byte,
            // so any byte-level hit starts on a char boundary.
            let needle = needle.as_bytes();
            haystack
                .as_bytes()
                .windows(needle.len())
                .position(|window| window.eq_ignore_ascii_case(needle))
                .map(|pos| pos + from)
        } else {
            haystack.find(needle).map(|pos| pos + from)
        }
    }

    fn find_in_tokens<W: AsRef<str>>(
        &self,
        words: &[W],
        pattern: &[&str],
        from: usize,
    ) -> Option<usize> {
        let last_start = words.len().checked_sub(pattern.len())?;

        (from..=last_start).find(|&start| {
            words[start..start + pattern.len()]
                .iter()
                .zip(pattern)
                .all(|(word, expected)| self.token_eq(word.as_ref(), expected))
        })
    }

    fn token_eq(&self, word: &str, expected: &str) -> bool {
        if self.case_insensitive {
            word.eq_ignore_ascii_case(expected)
        } else {
            word == expected
        }
    }
}

/// Offset of the char following the one that starts at `index`
fn next_char_boundary(text: &str, index: usize) -> usize {
    text[index..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| index + c.len_utf8())
}
