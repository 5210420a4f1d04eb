//! # Inline Parsing
//!
//! Cursor-based inline parsing with explicit raw zones.
//!
//! ## Architecture
//!
//! Inline parsing is separate from block parsing and operates over the
//! [`ContentView`](crate::parsing::blocks::ContentView) of inline-eligible
//! blocks (paragraphs, headings, table cells). It runs in two steps:
//!
//! 1. **Tokenize** into pieces: literal text, atoms (code spans, links,
//!    images, wiki links, math, footnote references, breaks, HTML) and
//!    delimiter runs (`* _ ~ = ^`).
//! 2. **Resolve** delimiter runs into mark pairs and apply each pair's mark
//!    to every piece between its opener and closer.
//!
//! ## Raw Zone Precedence
//!
//! Code spans take precedence: `` `[[not a link]]` `` is a single code span,
//! not text containing a wiki link. Link text is scanned recursively but may
//! not contain further links.
//!
//! ## Modules
//!
//! - **`types`**: `InlineScan`, `MarkPair`, `Construct`
//! - **`kinds`**: inline-specific types with owned delimiters
//! - **`cursor`**: `Cursor` for byte-by-byte scanning
//! - **`parser`**: `parse_inline()` entry point

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::parse_inline;
pub use types::{Construct, ConstructKind, InlineScan, MarkPair};
