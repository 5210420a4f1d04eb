//! # Block Kinds
//!
//! Block-specific types that own their syntax delimiters. Each kind knows
//! how to recognise its own opener (and closer, where it has one); the
//! dispatch order between kinds lives in `open`.

pub mod block_quote;
pub mod code_fence;
pub mod footnote;
pub mod front_matter;
pub mod heading;
pub mod html;
pub mod list_item;
pub mod math_block;
pub mod paragraph;
pub mod table;
pub mod thematic_break;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceSig};
pub use footnote::Footnote;
pub use front_matter::FrontMatter;
pub use heading::{Heading, HeadingLine};
pub use html::{HtmlEnd, HtmlSyntax};
pub use list_item::{ListItemSyntax, ListMarker};
pub use math_block::MathBlock;
pub use paragraph::Paragraph;
pub use table::TableSyntax;
pub use thematic_break::ThematicBreak;
