//! # Document Model
//!
//! The node vocabulary shared by the parser, serializer and position mapper.
//!
//! A [`Document`] is immutable-per-parse: every parse produces a fresh tree whose
//! nodes carry the [`Span`] they were parsed from. Nodes built by a renderer have
//! `span: None` until the next serialize/reparse cycle assigns one.
//!
//! ## Structure
//!
//! ```text
//! Document
//! └── Block*            paragraph, heading, fence, quote, list, table, ...
//!     ├── Inline*       (paragraph, heading)
//!     ├── Block*        (quote, alert, details, footnote definition)
//!     ├── ListItem*     (list)  └── Block*
//!     └── TableRow*     (table) └── TableCell* └── Inline*
//! ```
//!
//! Inline links nest further inlines. [`NodeRef`] and [`NodePath`] give uniform
//! access to this heterogeneous tree.

pub mod footnotes;
pub mod inline;
pub mod outline;
pub mod span;
pub mod table;
pub mod validate;

use serde::{Deserialize, Serialize};

pub use inline::{BreakStyle, Inline, InlineKind, Mark, Marks, plain_text};
pub use outline::outline;
pub use span::Span;
pub use table::{Alignment, Table, TableCell, TableRow};

/// A parsed (or renderer-built) markdown document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
    /// `[0, len)` of the text this tree was parsed from; `None` once detached.
    #[serde(default)]
    pub span: Option<Span>,
    /// Fragments that fell back to literal text during parsing.
    #[serde(default)]
    pub degradations: Vec<Degradation>,
}

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    #[serde(default)]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph(Vec<Inline>),
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    CodeFence {
        fence: Fence,
        language: Option<String>,
        code: String,
    },
    BlockQuote {
        /// Absolute nesting depth: the number of `>` tokens in front of the content.
        depth: u8,
        children: Vec<Block>,
    },
    List(List),
    Table(Table),
    HorizontalRule,
    Alert {
        kind: AlertKind,
        children: Vec<Block>,
    },
    Details {
        open: bool,
        summary: String,
        children: Vec<Block>,
    },
    FrontMatter(String),
    FootnoteDefinition {
        label: String,
        children: Vec<Block>,
    },
    HtmlBlock(String),
    MathBlock(String),
}

/// Fence delimiter of a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fence {
    pub kind: FenceKind,
    /// Number of fence characters (at least 3).
    pub len: usize,
}

impl Default for Fence {
    fn default() -> Self {
        Self {
            kind: FenceKind::Backticks,
            len: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    pub fn char(self) -> char {
        match self {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "NOTE" => Some(AlertKind::Note),
            "TIP" => Some(AlertKind::Tip),
            "IMPORTANT" => Some(AlertKind::Important),
            "WARNING" => Some(AlertKind::Warning),
            "CAUTION" => Some(AlertKind::Caution),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Note => "NOTE",
            AlertKind::Tip => "TIP",
            AlertKind::Important => "IMPORTANT",
            AlertKind::Warning => "WARNING",
            AlertKind::Caution => "CAUTION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    Ordered,
    Unordered,
    Task,
}

/// A list and its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub kind: ListKind,
    /// Nesting depth among lists (0 = top-level list).
    pub depth: usize,
    /// First number of an ordered list.
    pub start: u64,
    /// Bullet (`-`, `*`, `+`) or ordered delimiter (`.`, `)`).
    pub marker: char,
    /// Tight lists have no blank lines between items.
    pub tight: bool,
    pub items: Vec<ListItem>,
}

impl List {
    pub fn new(kind: ListKind, depth: usize, start: u64, items: Vec<ListItem>) -> Self {
        let marker = match kind {
            ListKind::Ordered => '.',
            ListKind::Unordered | ListKind::Task => '-',
        };
        Self {
            kind,
            depth,
            start,
            marker,
            tight: true,
            items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// `Some(checked)` for task items.
    pub checked: Option<bool>,
    pub children: Vec<Block>,
    #[serde(default)]
    pub span: Option<Span>,
}

impl ListItem {
    pub fn new(children: Vec<Block>) -> Self {
        Self {
            checked: None,
            children,
            span: None,
        }
    }
}

/// A literal-text fallback recorded while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degradation {
    pub span: Span,
    pub kind: DegradationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegradationKind {
    UnclosedCodeSpan,
    UnmatchedBracket,
    UnterminatedFence,
    UnterminatedMath,
    UnclosedDetails,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self { kind, span: None }
    }

    pub fn paragraph(content: Vec<Inline>) -> Self {
        Self::new(BlockKind::Paragraph(content))
    }

    /// Builds a heading, clamping `level` into `1..=6`.
    pub fn heading(level: u8, content: Vec<Inline>) -> Self {
        Self::new(BlockKind::Heading {
            level: level.clamp(1, 6),
            content,
        })
    }

    pub fn code_fence(language: Option<&str>, code: impl Into<String>) -> Self {
        Self::new(BlockKind::CodeFence {
            fence: Fence::default(),
            language: language.map(str::to_string),
            code: code.into(),
        })
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Inline content for paragraph-like blocks.
    pub fn inlines(&self) -> Option<&[Inline]> {
        match &self.kind {
            BlockKind::Paragraph(content) | BlockKind::Heading { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Nested blocks for container blocks.
    pub fn child_blocks(&self) -> Option<&[Block]> {
        match &self.kind {
            BlockKind::BlockQuote { children, .. }
            | BlockKind::Alert { children, .. }
            | BlockKind::Details { children, .. }
            | BlockKind::FootnoteDefinition { children, .. } => Some(children),
            _ => None,
        }
    }
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            span: None,
            degradations: Vec::new(),
        }
    }

    /// Removes every span, as if the tree had been built by a renderer.
    pub fn clear_spans(&mut self) {
        self.span = None;
        for b in &mut self.blocks {
            clear_block_spans(b);
        }
    }

    /// A copy with all spans and degradations removed, for structural comparison.
    #[must_use]
    pub fn detached(&self) -> Document {
        let mut d = self.clone();
        d.clear_spans();
        d.degradations.clear();
        d
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::Document(self)
    }

    /// Resolves a path to a node, or `None` if the path no longer exists.
    pub fn node(&self, path: &NodePath) -> Option<NodeRef<'_>> {
        let mut node = self.root();
        for &i in &path.0 {
            node = node.child(i)?;
        }
        Some(node)
    }
}

fn clear_block_spans(b: &mut Block) {
    b.span = None;
    match &mut b.kind {
        BlockKind::Paragraph(content) | BlockKind::Heading { content, .. } => {
            clear_inline_spans(content)
        }
        BlockKind::BlockQuote { children, .. }
        | BlockKind::Alert { children, .. }
        | BlockKind::Details { children, .. }
        | BlockKind::FootnoteDefinition { children, .. } => {
            children.iter_mut().for_each(clear_block_spans)
        }
        BlockKind::List(list) => {
            for item in &mut list.items {
                item.span = None;
                item.children.iter_mut().for_each(clear_block_spans);
            }
        }
        BlockKind::Table(table) => {
            for row in &mut table.rows {
                row.span = None;
                for cell in &mut row.cells {
                    cell.span = None;
                    clear_inline_spans(&mut cell.content);
                }
            }
        }
        BlockKind::CodeFence { .. }
        | BlockKind::HorizontalRule
        | BlockKind::FrontMatter(_)
        | BlockKind::HtmlBlock(_)
        | BlockKind::MathBlock(_) => {}
    }
}

fn clear_inline_spans(inlines: &mut [Inline]) {
    for i in inlines {
        i.span = None;
        if let Some(children) = i.children_mut() {
            clear_inline_spans(children);
        }
    }
}

/// Child-index path from the document root to a node. The empty path is the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn child(&self, i: usize) -> NodePath {
        let mut v = self.0.clone();
        v.push(i);
        NodePath(v)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(v: Vec<usize>) -> Self {
        NodePath(v)
    }
}

/// A borrowed reference to any node of the tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Document(&'a Document),
    Block(&'a Block),
    ListItem(&'a ListItem),
    TableRow(&'a TableRow),
    TableCell(&'a TableCell),
    Inline(&'a Inline),
}

impl<'a> NodeRef<'a> {
    pub fn span(self) -> Option<Span> {
        match self {
            NodeRef::Document(d) => d.span,
            NodeRef::Block(b) => b.span,
            NodeRef::ListItem(i) => i.span,
            NodeRef::TableRow(r) => r.span,
            NodeRef::TableCell(c) => c.span,
            NodeRef::Inline(i) => i.span,
        }
    }

    pub fn child_count(self) -> usize {
        match self {
            NodeRef::Document(d) => d.blocks.len(),
            NodeRef::Block(b) => match &b.kind {
                BlockKind::List(list) => list.items.len(),
                BlockKind::Table(table) => table.rows.len(),
                _ => b
                    .inlines()
                    .map(<[Inline]>::len)
                    .or_else(|| b.child_blocks().map(<[Block]>::len))
                    .unwrap_or(0),
            },
            NodeRef::ListItem(i) => i.children.len(),
            NodeRef::TableRow(r) => r.cells.len(),
            NodeRef::TableCell(c) => c.content.len(),
            NodeRef::Inline(i) => i.children().len(),
        }
    }

    pub fn child(self, i: usize) -> Option<NodeRef<'a>> {
        match self {
            NodeRef::Document(d) => d.blocks.get(i).map(NodeRef::Block),
            NodeRef::Block(b) => match &b.kind {
                BlockKind::List(list) => list.items.get(i).map(NodeRef::ListItem),
                BlockKind::Table(table) => table.rows.get(i).map(NodeRef::TableRow),
                _ => {
                    if let Some(inlines) = b.inlines() {
                        inlines.get(i).map(NodeRef::Inline)
                    } else {
                        b.child_blocks()?.get(i).map(NodeRef::Block)
                    }
                }
            },
            NodeRef::ListItem(item) => item.children.get(i).map(NodeRef::Block),
            NodeRef::TableRow(r) => r.cells.get(i).map(NodeRef::TableCell),
            NodeRef::TableCell(c) => c.content.get(i).map(NodeRef::Inline),
            NodeRef::Inline(inline) => inline.children().get(i).map(NodeRef::Inline),
        }
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> {
        (0..self.child_count()).filter_map(move |i| self.child(i))
    }
}
