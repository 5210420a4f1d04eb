//! # Markdown Parsing
//!
//! Text to [`Document`]. Lines come from an `xi_rope::Rope`; the block phase
//! builds the tree from line views and the inline phase scans each
//! paragraph-like run for links, code, math and emphasis.
//!
//! Parsing never fails: malformed syntax degrades to literal text and is
//! recorded in [`Document::degradations`]. Large inputs can be parsed in
//! chunks with [`YieldingParse`].

pub mod blocks;
pub mod inline;
pub mod rope;
pub mod yielding;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use xi_rope::Rope;

use crate::model::{Degradation, Document, Span};

use blocks::{BlockParser, Ctx};
use rope::line_table;

pub use yielding::{YieldingParse, YieldingProgress};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Keep single newlines inside paragraphs as hard breaks.
    pub preserve_line_breaks: bool,
}

/// Parses markdown text into a fresh document tree.
pub fn parse(text: &str, options: &ParseOptions) -> Document {
    parse_rope(&Rope::from(text), options)
}

pub fn parse_rope(rope: &Rope, options: &ParseOptions) -> Document {
    let src = rope.slice_to_cow(..);
    let lines = line_table(rope);

    let mut parser = BlockParser::new(&src, options.preserve_line_breaks);
    let blocks = parser.parse_blocks(&lines, Ctx::document());
    assemble(blocks, parser.finish(), src.len())
}

pub(crate) fn assemble(
    blocks: Vec<crate::model::Block>,
    mut degradations: Vec<Degradation>,
    len: usize,
) -> Document {
    degradations.sort_by_key(|d| (d.span.start, d.span.end));
    if !degradations.is_empty() {
        log::debug!("parse finished with {} degradation(s)", degradations.len());
    }
    Document {
        blocks,
        span: Some(Span::new(0, len)),
        degradations,
    }
}
