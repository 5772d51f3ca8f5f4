use super::{ChunkWindow, Delimiters, Infeasible, RelevanceMask, Violation, ViolationKind};
use crate::document::Document;
use crate::entity::Span;
use tracing::debug;

/// Re-checks planned windows against every chunking rule
///
/// One bad window rejects the whole plan.
pub struct WindowValidator<'a> {
    mask: &'a RelevanceMask,
    document: &'a Document,
    max_chunk_size: usize,
    min_padding: usize,
    /// Entity name and the token range it covers
    entity_tokens: Vec<(&'a str, Span)>,
    /// Set when relevance comes from delimiters; enables the balance check
    delimiters: Option<Delimiters>,
}

impl<'a> WindowValidator<'a> {
    pub fn new(
        mask: &'a RelevanceMask,
        document: &'a Document,
        max_chunk_size: usize,
        min_padding: usize,
    ) -> Self {
        Self {
            mask,
            document,
            max_chunk_size,
            min_padding,
            entity_tokens: Vec::new(),
            delimiters: None,
        }
    }

    /// Register entities whose token ranges no window may cut through
    pub fn entities(mut self, entity_tokens: Vec<(&'a str, Span)>) -> Self {
        self.entity_tokens = entity_tokens;
        self
    }

    /// Require balanced delimiters inside every window
    pub fn delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = Some(delimiters);
        self
    }

    /// Accept all windows or reject the plan at the first violation
    pub fn validate(&self, windows: Vec<ChunkWindow>) -> Result<Vec<ChunkWindow>, Infeasible> {
        for &window in &windows {
            if let Err(kind) = self.check(window) {
                let violation = Violation { window, kind };
                debug!(%violation, "rejecting chunk plan");
                return Err(Infeasible::Rejected(violation));
            }
        }
        Ok(windows)
    }

    fn check(&self, window: ChunkWindow) -> Result<(), ViolationKind> {
        let total = self.mask.len();

        if window.len() > self.max_chunk_size {
            return Err(ViolationKind::Oversized {
                len: window.len(),
                max: self.max_chunk_size,
            });
        }

        if window.end > total {
            return Err(ViolationKind::OutOfBounds { tokens: total });
        }

        let (leading, trailing) = self
            .mask
            .padding(window)
            .ok_or(ViolationKind::NoRelevantToken)?;

        // Windows touching either end of the sequence are exempt on that side
        if window.start > 0 && leading < self.min_padding {
            return Err(ViolationKind::LeadingPadding {
                found: leading,
                required: self.min_padding,
            });
        }

        if window.end < total && trailing < self.min_padding {
            return Err(ViolationKind::TrailingPadding {
                found: trailing,
                required: self.min_padding,
            });
        }

        if let Some((name, _)) = self
            .entity_tokens
            .iter()
            .find(|(_, tokens)| cuts(window, *tokens))
        {
            return Err(ViolationKind::SplitsEntity {
                name: name.to_string(),
            });
        }

        if let Some(delimiters) = &self.delimiters {
            let text = self.document.join_window(window).unwrap_or_default();
            let (open, close) = delimiters.count(&text);
            if open != close {
                return Err(ViolationKind::UnbalancedDelimiters { open, close });
            }
        }

        Ok(())
    }
}

/// True if a window boundary falls strictly inside the token range
fn cuts(window: ChunkWindow, tokens: Span) -> bool {
    let inside = |boundary: usize| tokens.start < boundary && boundary < tokens.end;
    inside(window.start) || inside(window.end)
}
