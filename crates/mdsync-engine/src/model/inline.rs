use serde::{Deserialize, Serialize};

use super::span::Span;

/// A single inline formatting mark.
///
/// The declaration order is the canonical nesting order used by the
/// serializer: earlier marks wrap later ones, `Code` is always innermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mark {
    Bold,
    Italic,
    Strike,
    Highlight,
    Superscript,
    Subscript,
    Code,
}

impl Mark {
    pub const ALL: [Mark; 7] = [
        Mark::Bold,
        Mark::Italic,
        Mark::Strike,
        Mark::Highlight,
        Mark::Superscript,
        Mark::Subscript,
        Mark::Code,
    ];

    /// The markdown delimiter the serializer writes for this mark.
    pub fn delimiter(self) -> &'static str {
        match self {
            Mark::Bold => "**",
            Mark::Italic => "*",
            Mark::Strike => "~~",
            Mark::Highlight => "==",
            Mark::Superscript => "^",
            Mark::Subscript => "~",
            Mark::Code => "`",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A small set of [`Mark`]s attached to a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Marks(u8);

impl Marks {
    pub const NONE: Marks = Marks(0);

    pub fn of(marks: &[Mark]) -> Self {
        let mut set = Marks::NONE;
        for m in marks {
            set.insert(*m);
        }
        set
    }

    pub fn insert(&mut self, m: Mark) {
        self.0 |= m.bit();
    }

    pub fn remove(&mut self, m: Mark) {
        self.0 &= !m.bit();
    }

    #[must_use]
    pub fn with(mut self, m: Mark) -> Self {
        self.insert(m);
        self
    }

    #[must_use]
    pub fn without(mut self, m: Mark) -> Self {
        self.remove(m);
        self
    }

    pub fn contains(self, m: Mark) -> bool {
        self.0 & m.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn union(self, other: Marks) -> Marks {
        Marks(self.0 | other.0)
    }

    #[must_use]
    pub fn intersection(self, other: Marks) -> Marks {
        Marks(self.0 & other.0)
    }

    /// Iterates the marks in canonical nesting order.
    pub fn iter(self) -> impl Iterator<Item = Mark> {
        Mark::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

/// How a hard line break was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BreakStyle {
    /// Two (or more) trailing spaces.
    #[default]
    Spaces,
    /// A trailing backslash.
    Backslash,
    /// A plain newline kept because line breaks are preserved.
    Newline,
}

/// An inline node. `marks` is the set of formatting marks wrapping the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inline {
    pub kind: InlineKind,
    #[serde(default)]
    pub marks: Marks,
    #[serde(default)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InlineKind {
    /// A run of literal text. With `Mark::Code` in the marks it is an inline code span.
    Text(String),
    Link {
        href: String,
        title: Option<String>,
        children: Vec<Inline>,
        /// Written as `<href>` rather than `[text](href)`.
        autolink: bool,
    },
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
    WikiLink {
        target: String,
        display: Option<String>,
    },
    WikiEmbed {
        target: String,
    },
    FootnoteRef {
        label: String,
    },
    Math(String),
    HardBreak(BreakStyle),
    Html(String),
}

impl Inline {
    pub fn new(kind: InlineKind) -> Self {
        Self {
            kind,
            marks: Marks::NONE,
            span: None,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(InlineKind::Text(s.into()))
    }

    pub fn marked(s: impl Into<String>, marks: Marks) -> Self {
        Self {
            kind: InlineKind::Text(s.into()),
            marks,
            span: None,
        }
    }

    pub fn code(s: impl Into<String>) -> Self {
        Self::marked(s, Marks::of(&[Mark::Code]))
    }

    pub fn footnote_ref(label: impl Into<String>) -> Self {
        Self::new(InlineKind::FootnoteRef {
            label: label.into(),
        })
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Child inlines (only links have any).
    pub fn children(&self) -> &[Inline] {
        match &self.kind {
            InlineKind::Link { children, .. } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match &mut self.kind {
            InlineKind::Link { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Plain-text rendering of the node, used for alt text and previews.
    pub fn plain_text(&self) -> String {
        match &self.kind {
            InlineKind::Text(s) | InlineKind::Math(s) | InlineKind::Html(s) => s.clone(),
            InlineKind::Link { children, .. } => plain_text(children),
            InlineKind::Image { alt, .. } => alt.clone(),
            InlineKind::WikiLink { target, display } => {
                display.clone().unwrap_or_else(|| target.clone())
            }
            InlineKind::WikiEmbed { target } => target.clone(),
            InlineKind::FootnoteRef { label } => format!("[^{label}]"),
            InlineKind::HardBreak(_) => "\n".to_string(),
        }
    }
}

/// Concatenated plain text of a run of inlines.
pub fn plain_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::plain_text).collect()
}
