//! Content projection for blocks whose text is split by container prefixes.
//!
//! A paragraph inside a blockquote has a `> ` in front of every physical line.
//! Inline parsing runs over the joined, prefix-free text; [`ContentView`] keeps
//! the mapping from positions in that joined text back to source offsets so
//! every inline node still gets an exact source span.

use crate::parsing::rope::{Line, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    /// Start in the joined text.
    local: usize,
    /// Corresponding source offset.
    abs: usize,
}

/// Joined inline content plus a local -> source offset map.
///
/// # Invariants
///
/// - segments are sorted by `local` and the first starts at 0
/// - within a segment the mapping is the identity shifted by `abs - local`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentView {
    pub text: String,
    segments: Vec<Segment>,
}

impl ContentView {
    /// A view over a single contiguous source range.
    pub fn contiguous(text: &str, abs: usize) -> Self {
        Self {
            text: text.to_string(),
            segments: vec![Segment { local: 0, abs }],
        }
    }

    /// Joins line contents with `\n`.
    ///
    /// The joining newline maps to the physical newline right after each
    /// line's content, so soft breaks keep exact spans.
    pub fn from_lines(src: &str, lines: &[Line]) -> Self {
        let mut text = String::new();
        let mut segments = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            segments.push(Segment {
                local: text.len(),
                abs: line.start,
            });
            text.push_str(line.text(src));
        }
        if segments.is_empty() {
            segments.push(Segment { local: 0, abs: 0 });
        }
        Self { text, segments }
    }

    /// Source offset of a position in the joined text.
    pub fn abs(&self, local: usize) -> usize {
        let idx = self
            .segments
            .partition_point(|s| s.local <= local)
            .saturating_sub(1);
        let seg = self.segments[idx];
        seg.abs + (local - seg.local)
    }

    /// Source span of a joined-text range.
    pub fn span(&self, start: usize, end: usize) -> Span {
        if end <= start {
            let at = self.abs(start);
            return Span::new(at, at);
        }
        // `end` is exclusive; map the last byte to stay inside its segment.
        Span::new(self.abs(start), self.abs(end - 1) + 1)
    }
}
