//! # Block Parsing
//!
//! A single top-to-bottom scan over line views with recursion into containers.
//!
//! ## Modules
//!
//! - **`kinds`**: block-specific types with owned delimiters (fence, quote, list item, table, ...)
//! - **`open`**: `try_open` priority dispatch deciding what a line opens
//! - **`builder`**: `BlockParser`, the recursive block parser
//! - **`content`**: `ContentView`, prefix-free inline content with a source offset map
//!
//! ## Key Invariants
//!
//! - Nesting depth is unbounded (lists in blockquotes in lists, etc.)
//! - Fenced code and math blocks are raw zones: no block/inline parsing inside
//! - Every block, list item, table row and cell stores its source span
//! - Any line that opens nothing joins or starts a paragraph; no input is rejected

pub mod builder;
pub mod content;
pub mod kinds;
pub mod open;

pub use builder::{BlockParser, Ctx};
pub use content::ContentView;
pub use open::{BlockOpen, try_open};
