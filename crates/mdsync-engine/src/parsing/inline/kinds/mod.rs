//! # Inline Kinds
//!
//! Inline-specific types that own their syntax delimiters. The scanner in
//! `parser` only decides *where* to try each kind; recognising the syntax is
//! the kind's job.
//!
//! - **`CodeSpan`**: backtick runs, a raw zone that suppresses other parsing
//! - **`LinkSyntax`**: `[text](href "title")`, `![alt](src)`
//! - **`WikiLink`**: `[[target|display]]`, `![[embed]]`
//! - **`InlineMath`**: `$latex$`
//! - **`AngleSyntax`**: `<autolinks>` and raw inline HTML
//! - **`Delimiter`**: `* _ ~ = ^` runs and their pairing rules

pub mod code_span;
pub mod delimiter;
pub mod html;
pub mod link;
pub mod math;
pub mod wikilink;

pub use code_span::CodeSpan;
pub use delimiter::Delimiter;
pub use html::AngleSyntax;
pub use link::{LinkSyntax, LinkTail, unescape};
pub use math::InlineMath;
pub use wikilink::{WikiLink, WikiMatch};
