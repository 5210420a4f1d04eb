use crate::model::{Degradation, Inline, Mark, Span};

/// A matched pair of delimiter runs, e.g. the two `**` around bold text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkPair {
    pub mark: Mark,
    /// Source span of the consumed opening delimiter characters.
    pub open: Span,
    /// Source span of the consumed closing delimiter characters.
    pub close: Span,
}

impl MarkPair {
    /// Everything between the delimiters.
    pub fn content(&self) -> Span {
        Span::new(self.open.end, self.close.start)
    }

    /// Delimiters included.
    pub fn span(&self) -> Span {
        Span::new(self.open.start, self.close.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructKind {
    Link,
    Image,
    WikiLink,
    WikiEmbed,
    Math,
    FootnoteRef,
    Code,
}

/// An atomic inline construct with both its full span and the span of its content
/// (link text, image alt, math source, footnote label, code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Construct {
    pub kind: ConstructKind,
    pub span: Span,
    pub content: Span,
}

/// Everything the inline phase learns about one run of inline content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineScan {
    pub nodes: Vec<Inline>,
    pub pairs: Vec<MarkPair>,
    pub constructs: Vec<Construct>,
    pub degradations: Vec<Degradation>,
}
