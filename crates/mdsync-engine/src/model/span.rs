use serde::{Deserialize, Serialize};

/// A byte range `[start, end)` into the text buffer a node was parsed from.
///
/// Spans are what the position mapper walks: a node's span locates it in the
/// flat text, and `start + node_offset` recovers a caret offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Half-open containment: `start <= offset < end`.
    ///
    /// An offset equal to `end` belongs to whatever follows, which gives the
    /// left-to-right tie-break at shared boundaries.
    #[must_use]
    pub fn contains(self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns true if `other` lies entirely within this span.
    #[must_use]
    pub fn encloses(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Shifts both ends by `delta` bytes.
    #[must_use]
    pub fn offset_by(self, delta: usize) -> Span {
        Span {
            start: self.start + delta,
            end: self.end + delta,
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(r: std::ops::Range<usize>) -> Self {
        Span::new(r.start, r.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let sp = Span::new(2, 5);
        assert!(!sp.contains(1));
        assert!(sp.contains(2));
        assert!(sp.contains(4));
        assert!(!sp.contains(5));
    }

    #[test]
    fn new_never_inverts() {
        let sp = Span::new(7, 3);
        assert_eq!(sp, Span { start: 7, end: 7 });
        assert!(sp.is_empty());
    }

    #[test]
    fn encloses_nested_span() {
        let outer = Span::new(0, 10);
        assert!(outer.encloses(Span::new(2, 10)));
        assert!(!outer.encloses(Span::new(2, 11)));
    }
}
