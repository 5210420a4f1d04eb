use crate::{model::AlertKind, parsing::rope::Line};

use super::kinds::{
    BlockQuote, CodeFence, FenceSig, Footnote, FrontMatter, Heading, HeadingLine, HtmlEnd,
    HtmlSyntax, ListItemSyntax, ListMarker, MathBlock, TableSyntax, ThematicBreak,
};

/// What the line at the parse position opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOpen {
    FrontMatter,
    Fence(FenceSig),
    Math,
    /// `$$ ... $$` on one line; inner byte range within the line.
    MathLine(usize, usize),
    Table,
    Alert(AlertKind),
    Details { open: bool, after: usize },
    Html(HtmlEnd),
    Footnote { label: String, content: usize },
    List(ListMarker),
    Quote,
    Heading(HeadingLine),
    ThematicBreak,
}

impl BlockOpen {
    /// Whether this opener ends a paragraph that is being collected.
    ///
    /// Ordered items may only interrupt a paragraph when they start at 1, so
    /// prose such as `2019. was a year` stays text.
    pub fn interrupts_paragraph(&self) -> bool {
        match self {
            BlockOpen::FrontMatter => false,
            BlockOpen::List(m) => m.number.is_none_or(|n| n == 1),
            _ => true,
        }
    }
}

/// Classifies `lines[i]` by block priority.
///
/// Order: front matter (first line of the document only), fence and display
/// math, table, alert/details/HTML/footnote directives, thematic break, list
/// item, blockquote, heading. `None` means paragraph text.
pub fn try_open(src: &str, lines: &[Line], i: usize, document_start: bool) -> Option<BlockOpen> {
    let line = lines.get(i)?;
    let text = line.text(src);

    if document_start && FrontMatter::opens(text) && front_matter_end(src, lines, i).is_some() {
        return Some(BlockOpen::FrontMatter);
    }
    if let Some(sig) = CodeFence::sig(text) {
        return Some(BlockOpen::Fence(sig));
    }
    if MathBlock::opens(text) {
        return Some(BlockOpen::Math);
    }
    if let Some((s, e)) = MathBlock::single_line(text) {
        return Some(BlockOpen::MathLine(s, e));
    }
    if is_table_start(src, lines, i) {
        return Some(BlockOpen::Table);
    }
    if let Some(kind) = alert_kind(text) {
        return Some(BlockOpen::Alert(kind));
    }
    if let Some((open, after)) = HtmlSyntax::details_open(text) {
        return Some(BlockOpen::Details { open, after });
    }
    if let Some(end) = HtmlSyntax::block_start(text) {
        return Some(BlockOpen::Html(end));
    }
    if let Some((label, content)) = Footnote::definition(text) {
        return Some(BlockOpen::Footnote { label, content });
    }
    // `- - -` and `* * *` are rules, never list items.
    if ThematicBreak::matches(text) {
        return Some(BlockOpen::ThematicBreak);
    }
    if let Some(m) = ListItemSyntax::marker(text) {
        return Some(BlockOpen::List(m));
    }
    if BlockQuote::strip_one(text).is_some() {
        return Some(BlockOpen::Quote);
    }
    if let Some(h) = Heading::parse(text) {
        return Some(BlockOpen::Heading(h));
    }
    None
}

/// Index of the line closing front matter opened at `i`.
pub fn front_matter_end(src: &str, lines: &[Line], i: usize) -> Option<usize> {
    (i + 1..lines.len()).find(|&j| FrontMatter::closes(lines[j].text(src)))
}

fn is_table_start(src: &str, lines: &[Line], i: usize) -> bool {
    let header = lines[i].text(src);
    let Some(sep) = lines.get(i + 1).map(|l| l.text(src)) else {
        return false;
    };
    TableSyntax::has_pipe(header)
        && TableSyntax::is_separator(sep)
        && TableSyntax::cells(header).len() == TableSyntax::cells(sep).len()
}

fn alert_kind(text: &str) -> Option<AlertKind> {
    let at = BlockQuote::strip_one(text)?;
    BlockQuote::alert_kind(&text[at..])
}

#[cfg(test)]
mod tests {
    use xi_rope::Rope;

    use super::*;
    use crate::parsing::rope::line_table;

    fn open_at(src: &str, i: usize) -> Option<BlockOpen> {
        let lines = line_table(&Rope::from(src));
        try_open(src, &lines, i, i == 0)
    }

    #[test]
    fn fence_beats_everything() {
        assert!(matches!(open_at("```\n| a |", 0), Some(BlockOpen::Fence(_))));
    }

    #[test]
    fn table_needs_separator() {
        assert_eq!(open_at("a | b\n--|--", 0), Some(BlockOpen::Table));
        assert_eq!(open_at("a | b\nplain", 0), None);
        // header and separator must agree on the cell count
        assert_eq!(open_at("a | b | c\n--|--", 0), None);
    }

    #[test]
    fn alert_before_quote() {
        assert_eq!(
            open_at("> [!TIP]\n> x", 0),
            Some(BlockOpen::Alert(AlertKind::Tip))
        );
        assert_eq!(open_at("> [!TIP] x", 0), Some(BlockOpen::Quote));
    }

    #[test]
    fn rule_is_not_a_list_item() {
        assert_eq!(open_at("- - -", 0), Some(BlockOpen::ThematicBreak));
        assert!(matches!(open_at("- x", 0), Some(BlockOpen::List(_))));
    }

    #[test]
    fn front_matter_only_at_start_and_closed() {
        assert_eq!(open_at("---\na: 1\n---", 0), Some(BlockOpen::FrontMatter));
        assert_eq!(open_at("---\na: 1", 0), Some(BlockOpen::ThematicBreak));
        assert_eq!(open_at("x\n---\na\n---", 1), Some(BlockOpen::ThematicBreak));
    }

    #[test]
    fn ordered_item_interrupts_only_from_one() {
        let two = ListItemSyntax::marker("2. x").map(BlockOpen::List).unwrap();
        let one = ListItemSyntax::marker("1. x").map(BlockOpen::List).unwrap();
        assert!(!two.interrupts_paragraph());
        assert!(one.interrupts_paragraph());
    }
}
