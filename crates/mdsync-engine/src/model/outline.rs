//! Indented one-node-per-line dump of a document tree.
//!
//! Used by the command line `tree` command and by snapshot tests. Each line
//! is the node kind, its key fields and its span (`@start..end`, or `@-`
//! for nodes without one).

use std::fmt::Write;

use super::{Block, BlockKind, Document, Inline, InlineKind, Marks, Span};

pub fn outline(doc: &Document) -> String {
    let mut out = String::new();
    for b in &doc.blocks {
        block(&mut out, b, 0);
    }
    out
}

fn span(s: Option<Span>) -> String {
    match s {
        Some(s) => format!("@{}..{}", s.start, s.end),
        None => "@-".to_string(),
    }
}

fn marks(m: Marks) -> String {
    if m.is_empty() {
        return String::new();
    }
    let names: Vec<String> = m.iter().map(|m| format!("{m:?}")).collect();
    format!(" [{}]", names.join(" "))
}

fn line(out: &mut String, depth: usize, label: &str, s: Option<Span>) {
    let _ = writeln!(out, "{:indent$}{label} {}", "", span(s), indent = depth * 2);
}

fn block(out: &mut String, b: &Block, depth: usize) {
    let label = match &b.kind {
        BlockKind::Paragraph(_) => "Paragraph".to_string(),
        BlockKind::Heading { level, .. } => format!("Heading({level})"),
        BlockKind::CodeFence {
            fence,
            language,
            code,
        } => format!("CodeFence({:?}x{}) {language:?} {code:?}", fence.kind, fence.len),
        BlockKind::BlockQuote { depth, .. } => format!("BlockQuote({depth})"),
        BlockKind::List(list) => format!(
            "List({:?}, depth={}, start={}, marker={:?}, tight={})",
            list.kind, list.depth, list.start, list.marker, list.tight
        ),
        BlockKind::Table(t) => format!("Table {:?}", t.alignments),
        BlockKind::HorizontalRule => "HorizontalRule".to_string(),
        BlockKind::Alert { kind, .. } => format!("Alert({kind:?})"),
        BlockKind::Details { open, summary, .. } => format!("Details(open={open}) {summary:?}"),
        BlockKind::FrontMatter(yaml) => format!("FrontMatter {yaml:?}"),
        BlockKind::FootnoteDefinition { label, .. } => format!("FootnoteDefinition {label:?}"),
        BlockKind::HtmlBlock(raw) => format!("HtmlBlock {raw:?}"),
        BlockKind::MathBlock(latex) => format!("MathBlock {latex:?}"),
    };
    line(out, depth, &label, b.span);

    match &b.kind {
        BlockKind::Paragraph(content) | BlockKind::Heading { content, .. } => {
            content.iter().for_each(|i| inline(out, i, depth + 1))
        }
        BlockKind::List(list) => {
            for item in &list.items {
                let label = match item.checked {
                    Some(c) => format!("Item(checked={c})"),
                    None => "Item".to_string(),
                };
                line(out, depth + 1, &label, item.span);
                item.children.iter().for_each(|c| block(out, c, depth + 2));
            }
        }
        BlockKind::Table(t) => {
            for row in &t.rows {
                line(out, depth + 1, "Row", row.span);
                for cell in &row.cells {
                    line(out, depth + 2, "Cell", cell.span);
                    cell.content.iter().for_each(|i| inline(out, i, depth + 3));
                }
            }
        }
        _ => {
            if let Some(children) = b.child_blocks() {
                children.iter().for_each(|c| block(out, c, depth + 1));
            }
        }
    }
}

fn inline(out: &mut String, i: &Inline, depth: usize) {
    let label = match &i.kind {
        InlineKind::Text(s) => format!("Text {s:?}"),
        InlineKind::Link {
            href,
            title,
            autolink,
            ..
        } => {
            let auto = if *autolink { " auto" } else { "" };
            match title {
                Some(t) => format!("Link {href:?} {t:?}{auto}"),
                None => format!("Link {href:?}{auto}"),
            }
        }
        InlineKind::Image { src, alt, .. } => format!("Image {src:?} alt={alt:?}"),
        InlineKind::WikiLink { target, display } => match display {
            Some(d) => format!("WikiLink {target:?} | {d:?}"),
            None => format!("WikiLink {target:?}"),
        },
        InlineKind::WikiEmbed { target } => format!("WikiEmbed {target:?}"),
        InlineKind::FootnoteRef { label } => format!("FootnoteRef {label:?}"),
        InlineKind::Math(latex) => format!("Math {latex:?}"),
        InlineKind::HardBreak(style) => format!("HardBreak({style:?})"),
        InlineKind::Html(raw) => format!("Html {raw:?}"),
    };
    line(out, depth, &format!("{label}{}", marks(i.marks)), i.span);
    for c in i.children() {
        inline(out, c, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mark;

    #[test]
    fn outline_without_spans() {
        let doc = Document::new(vec![Block::heading(
            2,
            vec![Inline::marked("hi", Marks::of(&[Mark::Bold]))],
        )]);
        insta::assert_snapshot!(outline(&doc), @r#"
        Heading(2) @-
          Text "hi" [Bold] @-
        "#);
    }
}
