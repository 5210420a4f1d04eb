//! # Position Mapping
//!
//! Text offsets to tree locations and back, through node spans.
//!
//! A [`TreeLocation`] names the innermost node whose span contains the offset
//! and the distance from that span's start. Containment is half-open, so an
//! offset on a boundary shared by two siblings belongs to the second one.
//! Offsets in gaps between blocks resolve to the document root, whose span
//! covers the whole text; the end of the text resolves to the deepest node
//! ending there.
//!
//! Lookup is a binary search over the top-level blocks followed by a linear
//! descent, so it costs O(log n + depth * fan-out).

use serde::{Deserialize, Serialize};

use crate::{
    error::StalePosition,
    model::{Document, NodePath, NodeRef, Span},
};

/// A caret expressed against the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TreeLocation {
    pub path: NodePath,
    /// Bytes from the start of the node's span.
    pub node_offset: usize,
}

/// Maps a text offset into `doc`, or `None` when the tree no longer matches
/// the text (spans missing, offset past the end).
pub fn to_tree_location(offset: usize, doc: &Document) -> Option<TreeLocation> {
    locate(offset, doc)
        .inspect_err(|e| log::warn!("stale caret position: {e}"))
        .ok()
}

/// Maps a tree location back to a text offset, or `None` when the node is
/// gone or has no span.
pub fn to_text_offset(path: &NodePath, node_offset: usize, doc: &Document) -> Option<usize> {
    resolve(path, node_offset, doc)
        .inspect_err(|e| log::warn!("stale caret position: {e}"))
        .ok()
}

/// [`to_tree_location`] with the reason for failure.
pub fn locate(offset: usize, doc: &Document) -> Result<TreeLocation, StalePosition> {
    let stale = || StalePosition::Offset {
        offset,
        span: doc.span,
    };
    let root = doc.span.ok_or_else(stale)?;
    if offset < root.start || offset > root.end {
        return Err(stale());
    }

    let mut path = NodePath::root();
    let mut node = doc.root();
    let mut span = root;
    if offset == root.end {
        // Nothing contains the end offset; stay inside whatever ends there.
        while let Some((i, child, s)) = last_ending_at(node, offset) {
            path.0.push(i);
            node = child;
            span = s;
        }
    } else {
        let mut next = top_level_containing(doc, offset);
        while let Some((i, child, s)) = next {
            path.0.push(i);
            node = child;
            span = s;
            next = child_containing(node, offset);
        }
    }

    Ok(TreeLocation {
        path,
        node_offset: offset - span.start,
    })
}

/// [`to_text_offset`] with the reason for failure.
pub fn resolve(path: &NodePath, node_offset: usize, doc: &Document) -> Result<usize, StalePosition> {
    let span = doc
        .node(path)
        .and_then(NodeRef::span)
        .filter(|s| node_offset <= s.len())
        .ok_or_else(|| StalePosition::Node(path.clone()))?;
    Ok(span.start + node_offset)
}

fn top_level_containing(doc: &Document, offset: usize) -> Option<(usize, NodeRef<'_>, Span)> {
    let i = doc
        .blocks
        .partition_point(|b| b.span.is_some_and(|s| s.end <= offset));
    let b = doc.blocks.get(i)?;
    let span = b.span.filter(|s| s.contains(offset))?;
    Some((i, NodeRef::Block(b), span))
}

fn child_containing(node: NodeRef<'_>, offset: usize) -> Option<(usize, NodeRef<'_>, Span)> {
    node.children().enumerate().find_map(|(i, child)| {
        let span = child.span().filter(|s| s.contains(offset))?;
        Some((i, child, span))
    })
}

fn last_ending_at(node: NodeRef<'_>, offset: usize) -> Option<(usize, NodeRef<'_>, Span)> {
    let i = node.child_count().checked_sub(1)?;
    let child = node.child(i)?;
    let span = child.span().filter(|s| s.end == offset)?;
    Some((i, child, span))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::parsing::{ParseOptions, parse};

    fn loc(path: &[usize], node_offset: usize) -> TreeLocation {
        TreeLocation {
            path: NodePath(path.to_vec()),
            node_offset,
        }
    }

    #[test]
    fn resolves_innermost_node() {
        let doc = parse("# Title\n\nSee **bold** x", &ParseOptions::default());
        // Inside "Title": heading > text.
        assert_eq!(to_tree_location(4, &doc), Some(loc(&[0, 0], 2)));
        // Inside "bold" (15..19): paragraph > second inline.
        assert_eq!(to_tree_location(17, &doc), Some(loc(&[1, 1], 2)));
        // On a delimiter: no inline contains it.
        assert_eq!(to_tree_location(14, &doc), Some(loc(&[1], 5)));
    }

    #[test]
    fn shared_boundary_goes_to_following_node() {
        let doc = parse("a  \nb", &ParseOptions::default());
        // Offset 4 ends the hard break and starts "b".
        assert_eq!(to_tree_location(4, &doc), Some(loc(&[0, 2], 0)));
    }

    #[test]
    fn gaps_resolve_to_root() {
        let doc = parse("# T\n\nbody", &ParseOptions::default());
        assert_eq!(to_tree_location(4, &doc), Some(loc(&[], 4)));
    }

    #[test]
    fn end_of_text_stays_in_last_node() {
        let doc = parse("# T\n\nbody", &ParseOptions::default());
        assert_eq!(to_tree_location(9, &doc), Some(loc(&[1, 0], 4)));
        let doc = parse("body\n", &ParseOptions::default());
        assert_eq!(to_tree_location(5, &doc), Some(loc(&[], 5)));
    }

    #[test]
    fn nested_containers_descend() {
        let doc = parse("> - item", &ParseOptions::default());
        // quote > list > item > paragraph > text
        assert_eq!(to_tree_location(5, &doc), Some(loc(&[0, 0, 0, 0, 0], 1)));
    }

    #[test]
    fn stale_trees_yield_none() {
        let mut doc = parse("some text", &ParseOptions::default());
        assert_eq!(to_tree_location(20, &doc), None);
        assert_eq!(
            locate(20, &doc),
            Err(StalePosition::Offset {
                offset: 20,
                span: Some(Span::new(0, 9)),
            })
        );
        assert_eq!(to_text_offset(&NodePath(vec![3]), 0, &doc), None);
        assert_eq!(to_text_offset(&NodePath(vec![0]), 10, &doc), None);

        doc.clear_spans();
        assert_eq!(to_tree_location(2, &doc), None);
        assert_eq!(
            resolve(&NodePath(vec![0]), 0, &doc),
            Err(StalePosition::Node(NodePath(vec![0])))
        );
    }

    #[rstest]
    #[case("# Title\n\nSee[^1] note.\n\n[^1]: ref")]
    #[case("> quote *em*\n> > deeper\n\n- a\n  - b\n- [x] c")]
    #[case("| a | b |\n|---|:-:|\n| 1 | 2 |\n\n```rust\ncode\n```")]
    #[case("[link](u) ![i](s) [[w|d]] $x$ `c` ~~s~~ ==h==\nnext  \nline")]
    #[case("---\nk: v\n---\n\n<details>\n<summary>S</summary>\n\nin\n\n</details>")]
    #[case("héllo wörld ✓ **ünïcode**")]
    fn every_offset_round_trips(#[case] text: &str) {
        let doc = parse(text, &ParseOptions::default());
        for offset in (0..=text.len()).filter(|&o| text.is_char_boundary(o)) {
            let loc = to_tree_location(offset, &doc).expect("fresh tree");
            assert_eq!(
                to_text_offset(&loc.path, loc.node_offset, &doc),
                Some(offset),
                "offset {offset} -> {loc:?}"
            );
        }
    }
}
