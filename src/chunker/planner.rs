use super::{ChunkWindow, Infeasible, RelevanceMask};
use tracing::{debug, trace};

/// Greedy left-to-right scan choosing chunk windows over a relevance mask
///
/// Every relevant token opens a window `min_padding` tokens to its left, then
/// the window:
/// - swallows directly following relevant tokens while the size budget lasts
/// - is capped at `max_chunk_size`
/// - is filled up to `max_chunk_size`, first forward, then backward down to
///   the end of the previous window
///
/// Scanning resumes at the window end. Windows come out ordered by start and
/// each holds at least one relevant token. Padding is not guaranteed here;
/// the validator is the binding check.
///
/// Returns [`Infeasible::Stalled`] when a window cannot reach past the token
/// that opened it, which happens when `min_padding` leaves no room in
/// `max_chunk_size` for the entity itself.
pub fn plan(
    mask: &RelevanceMask,
    max_chunk_size: usize,
    min_padding: usize,
) -> Result<Vec<ChunkWindow>, Infeasible> {
    let total = mask.len();
    let mut windows: Vec<ChunkWindow> = Vec::new();
    let mut index = 0;

    while index < total {
        if !mask.is_relevant(index) {
            index += 1;
            continue;
        }

        let mut start = index.saturating_sub(min_padding);
        let mut end = index
            .saturating_add(min_padding)
            .saturating_add(1)
            .min(total);

        // Merge closely spaced entities into one window
        while end - start < max_chunk_size && end < total && mask.is_relevant(end) {
            end += 1;
        }

        end = end.min(start.saturating_add(max_chunk_size));

        while end < total && end - start < max_chunk_size {
            end += 1;
        }

        let floor = windows.last().map_or(0, |previous| previous.end);
        while start > floor && end - start < max_chunk_size {
            start -= 1;
        }

        if end <= index {
            debug!(index, start, end, "chunk window cannot advance past its entity");
            return Err(Infeasible::Stalled { index });
        }

        trace!(index, start, end, "planned chunk window");
        windows.push(ChunkWindow::new(start, end));
        index = end;
    }

    debug!(windows = windows.len(), tokens = total, "planning finished");
    Ok(windows)
}
