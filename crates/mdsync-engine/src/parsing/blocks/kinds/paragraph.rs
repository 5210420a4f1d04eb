/// Paragraph block type (marker struct).
///
/// Paragraphs have no delimiters - they are the default leaf block
/// when no other block opener matches. Inline parsing is applied
/// to paragraph content.
pub struct Paragraph;

impl Paragraph {
    /// Trailing spaces that turn a line end into a hard break.
    pub const HARD_BREAK_SPACES: usize = 2;
}
