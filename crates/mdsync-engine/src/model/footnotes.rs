//! Footnote renumbering.
//!
//! References and definitions are associated by label equality. Renumbering
//! assigns `1, 2, 3, ...` in order of first reference appearance and orders the
//! top-level definitions the same way; definitions nobody references keep
//! their relative order after the referenced ones.

use std::collections::HashMap;

use super::{Block, BlockKind, Document, Inline, InlineKind};

/// Result of [`renumber`].
#[derive(Debug, Clone, PartialEq)]
pub struct Renumbered {
    /// The relabelled document (block order unchanged).
    pub document: Document,
    /// Indices of top-level footnote definitions in emission order.
    pub definition_order: Vec<usize>,
    /// Original label -> new numeric label.
    pub labels: HashMap<String, String>,
}

pub fn renumber(doc: &Document) -> Renumbered {
    let mut order: Vec<String> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    let mut note = |label: &str, order: &mut Vec<String>| {
        if !seen.contains_key(label) {
            seen.insert(label.to_string(), order.len());
            order.push(label.to_string());
        }
    };

    let definitions: Vec<(usize, &str)> = doc
        .blocks
        .iter()
        .enumerate()
        .filter_map(|(i, b)| match &b.kind {
            BlockKind::FootnoteDefinition { label, .. } => Some((i, label.as_str())),
            _ => None,
        })
        .collect();

    for b in &doc.blocks {
        if !matches!(b.kind, BlockKind::FootnoteDefinition { .. }) {
            collect_block_refs(b, &mut |l| note(l, &mut order));
        }
    }

    // Definitions may reference further footnotes; those join the order as
    // their referencing definition is reached.
    let mut definition_order = Vec::with_capacity(definitions.len());
    let mut placed = vec![false; definitions.len()];
    let mut next = 0;
    loop {
        while next < order.len() {
            let label = order[next].clone();
            next += 1;
            for (k, (idx, l)) in definitions.iter().enumerate() {
                if !placed[k] && *l == label {
                    placed[k] = true;
                    definition_order.push(*idx);
                    collect_block_refs(&doc.blocks[*idx], &mut |l| note(l, &mut order));
                }
            }
        }
        // Unreferenced definitions: take the first remaining one and continue.
        match placed.iter().position(|p| !p) {
            Some(k) => note(definitions[k].1, &mut order),
            None => break,
        }
    }

    let labels: HashMap<String, String> = order
        .iter()
        .enumerate()
        .map(|(i, l)| (l.clone(), (i + 1).to_string()))
        .collect();

    let mut document = doc.clone();
    for b in &mut document.blocks {
        relabel_block(b, &labels);
    }

    Renumbered {
        document,
        definition_order,
        labels,
    }
}

fn collect_block_refs(b: &Block, f: &mut dyn FnMut(&str)) {
    match &b.kind {
        BlockKind::Paragraph(content) | BlockKind::Heading { content, .. } => {
            collect_inline_refs(content, f)
        }
        BlockKind::BlockQuote { children, .. }
        | BlockKind::Alert { children, .. }
        | BlockKind::Details { children, .. }
        | BlockKind::FootnoteDefinition { children, .. } => {
            children.iter().for_each(|c| collect_block_refs(c, f))
        }
        BlockKind::List(list) => list
            .items
            .iter()
            .flat_map(|i| &i.children)
            .for_each(|c| collect_block_refs(c, f)),
        BlockKind::Table(t) => t
            .rows
            .iter()
            .flat_map(|r| &r.cells)
            .for_each(|c| collect_inline_refs(&c.content, f)),
        _ => {}
    }
}

fn collect_inline_refs(inlines: &[Inline], f: &mut dyn FnMut(&str)) {
    for i in inlines {
        match &i.kind {
            InlineKind::FootnoteRef { label } => f(label),
            InlineKind::Link { children, .. } => collect_inline_refs(children, f),
            _ => {}
        }
    }
}

fn relabel_block(b: &mut Block, labels: &HashMap<String, String>) {
    match &mut b.kind {
        BlockKind::Paragraph(content) | BlockKind::Heading { content, .. } => {
            relabel_inlines(content, labels)
        }
        BlockKind::FootnoteDefinition { label, children } => {
            if let Some(n) = labels.get(label.as_str()) {
                *label = n.clone();
            }
            children.iter_mut().for_each(|c| relabel_block(c, labels));
        }
        BlockKind::BlockQuote { children, .. }
        | BlockKind::Alert { children, .. }
        | BlockKind::Details { children, .. } => {
            children.iter_mut().for_each(|c| relabel_block(c, labels))
        }
        BlockKind::List(list) => list
            .items
            .iter_mut()
            .flat_map(|i| &mut i.children)
            .for_each(|c| relabel_block(c, labels)),
        BlockKind::Table(t) => t
            .rows
            .iter_mut()
            .flat_map(|r| &mut r.cells)
            .for_each(|c| relabel_inlines(&mut c.content, labels)),
        _ => {}
    }
}

fn relabel_inlines(inlines: &mut [Inline], labels: &HashMap<String, String>) {
    for i in inlines {
        match &mut i.kind {
            InlineKind::FootnoteRef { label } => {
                if let Some(n) = labels.get(label.as_str()) {
                    *label = n.clone();
                }
            }
            InlineKind::Link { children, .. } => relabel_inlines(children, labels),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn def(label: &str, text: &str) -> Block {
        Block::new(BlockKind::FootnoteDefinition {
            label: label.into(),
            children: vec![Block::paragraph(vec![Inline::text(text)])],
        })
    }

    fn labels_in(doc: &Document) -> Vec<String> {
        let mut out = vec![];
        for b in &doc.blocks {
            collect_block_refs(b, &mut |l| out.push(l.to_string()));
        }
        out
    }

    #[test]
    fn orders_by_first_reference() {
        let doc = Document::new(vec![
            Block::paragraph(vec![
                Inline::footnote_ref("x"),
                Inline::text(" and "),
                Inline::footnote_ref("a"),
                Inline::text(" again "),
                Inline::footnote_ref("x"),
            ]),
            def("a", "alpha"),
            def("x", "ex"),
        ]);

        let r = renumber(&doc);

        assert_eq!(r.labels["x"], "1");
        assert_eq!(r.labels["a"], "2");
        // definitions: x (index 2) first, then a (index 1)
        assert_eq!(r.definition_order, vec![2, 1]);
        let body: Vec<_> = labels_in(&Document::new(vec![r.document.blocks[0].clone()]));
        assert_eq!(body, vec!["1", "2", "1"]);
    }

    #[test]
    fn unreferenced_definitions_come_last() {
        let doc = Document::new(vec![
            def("orphan", "o"),
            Block::paragraph(vec![Inline::footnote_ref("used")]),
            def("used", "u"),
        ]);

        let r = renumber(&doc);

        assert_eq!(r.definition_order, vec![2, 0]);
        assert_eq!(r.labels["used"], "1");
        assert_eq!(r.labels["orphan"], "2");
    }

    #[test]
    fn references_inside_definitions_follow_their_parent() {
        let doc = Document::new(vec![
            Block::paragraph(vec![Inline::footnote_ref("a")]),
            Block::new(BlockKind::FootnoteDefinition {
                label: "a".into(),
                children: vec![Block::paragraph(vec![Inline::footnote_ref("b")])],
            }),
            def("b", "bee"),
        ]);

        let r = renumber(&doc);

        assert_eq!(r.labels["a"], "1");
        assert_eq!(r.labels["b"], "2");
        assert_eq!(r.definition_order, vec![1, 2]);
    }
}
