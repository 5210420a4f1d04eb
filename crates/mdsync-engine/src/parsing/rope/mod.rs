pub mod lines;
pub mod slice;

pub use crate::model::Span;
pub use lines::{Line, line_table, lines_with_spans};
pub use slice::preview;
