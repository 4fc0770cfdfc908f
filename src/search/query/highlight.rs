//! Highlight windows around query matches
//!
//! The article is reduced to text and every query match is marked. Each marker
//! that does not fall inside the previous window opens a new window of fixed
//! length; windows are re-stripped, escaped and re-marked so a window cut in
//! the middle of a marker still renders cleanly.

use std::sync::Arc;

use super::markup::{Highlighter, MARK_OPEN, strip_tags};
use crate::content::ContentItem;
use crate::search::assembler::ContentAssembler;

/// Choose window start positions from ascending marker positions.
///
/// A position is skipped when it is not past the end of the previous window
/// (`p <= last_start + length`).
///
/// ```
/// use content_search::search::select_windows;
///
/// assert_eq!(select_windows(&[0, 5, 12], 10), vec![0, 12]);
/// ```
#[must_use]
pub fn select_windows(positions: &[usize], length: usize) -> Vec<usize> {
    let mut limit: Option<usize> = None;
    let mut starts = Vec::new();
    for &position in positions {
        if limit.is_some_and(|limit| position <= limit) {
            continue;
        }
        starts.push(position);
        limit = Some(position.saturating_add(length));
    }
    starts
}

/// Produces marked-up snippets of an item's article
pub struct HighlightExtractor {
    assembler: Arc<ContentAssembler>,
    length: usize,
    count: usize,
}

impl HighlightExtractor {
    #[must_use]
    pub fn new(assembler: Arc<ContentAssembler>, length: usize, count: usize) -> Self {
        Self {
            assembler,
            length,
            count,
        }
    }

    /// At most `count` non-overlapping highlight windows for `query` in `item`
    pub fn highlights(&self, query: &str, item: &dyn ContentItem) -> Vec<String> {
        let Some(highlighter) = Highlighter::new(query) else {
            return Vec::new();
        };

        let text = highlighter.mark(&strip_tags(&self.assembler.article(item)));
        let positions: Vec<usize> = text.match_indices(MARK_OPEN).map(|(at, _)| at).collect();

        select_windows(&positions, self.length)
            .into_iter()
            .take(self.count)
            .map(|start| {
                let window = window_at(&text, start, self.length);
                let stripped = strip_tags(window);
                highlighter.mark(&html_escape::encode_text(&stripped))
            })
            .collect()
    }
}

/// `length` bytes of `text` from `start`, extended to the next char boundary
fn window_at(text: &str, start: usize, length: usize) -> &str {
    let mut end = start.saturating_add(length).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}
