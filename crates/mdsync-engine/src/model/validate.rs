//! Structural invariant checks.
//!
//! Violations are tolerated while a tree is being built. They only matter once
//! the tree is about to be serialized: repairable ones (ragged tables) are fixed
//! in place, the rest are reported as fatal.

use crate::error::StructuralError;

use super::{Block, BlockKind, Document, FenceKind};

/// Returns the first fatal violation in `doc`, ignoring repairable ones.
pub fn check(doc: &Document) -> Result<(), StructuralError> {
    let mut found = Vec::new();
    for b in &doc.blocks {
        visit(b, &mut found);
    }
    match found.into_iter().find(|e| !e.is_repairable()) {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Pads/truncates ragged tables in place. Returns the violations that were fixed.
pub fn repair(doc: &mut Document) -> Vec<StructuralError> {
    let mut fixed = Vec::new();
    for b in &mut doc.blocks {
        repair_block(b, &mut fixed);
    }
    for e in &fixed {
        log::warn!("repaired structural violation: {e}");
    }
    fixed
}

fn visit(b: &Block, out: &mut Vec<StructuralError>) {
    match &b.kind {
        BlockKind::Heading { level, .. } if !(1..=6).contains(level) => {
            out.push(StructuralError::HeadingLevel { level: *level })
        }
        BlockKind::CodeFence {
            fence,
            language: Some(lang),
            ..
        } => {
            let bad_tick = fence.kind == FenceKind::Backticks && lang.contains('`');
            if lang.contains('\n') || bad_tick {
                out.push(StructuralError::InvalidFenceInfo(lang.clone()));
            }
        }
        BlockKind::Table(t) => {
            if t.column_count() == 0 {
                out.push(StructuralError::EmptyTable);
            }
            for (row, r) in t.rows.iter().enumerate() {
                if r.cells.len() != t.column_count() {
                    out.push(StructuralError::ColumnMismatch {
                        row,
                        expected: t.column_count(),
                        found: r.cells.len(),
                    });
                }
            }
        }
        BlockKind::List(list) => {
            for item in &list.items {
                item.children.iter().for_each(|c| visit(c, out));
            }
        }
        _ => {
            if let Some(children) = b.child_blocks() {
                children.iter().for_each(|c| visit(c, out));
            }
        }
    }
}

fn repair_block(b: &mut Block, fixed: &mut Vec<StructuralError>) {
    match &mut b.kind {
        BlockKind::Table(t) => {
            let expected = t.column_count();
            for (row, r) in t.rows.iter().enumerate() {
                if r.cells.len() != expected {
                    fixed.push(StructuralError::ColumnMismatch {
                        row,
                        expected,
                        found: r.cells.len(),
                    });
                }
            }
            t.normalize();
        }
        BlockKind::List(list) => {
            for item in &mut list.items {
                item.children.iter_mut().for_each(|c| repair_block(c, fixed));
            }
        }
        BlockKind::BlockQuote { children, .. }
        | BlockKind::Alert { children, .. }
        | BlockKind::Details { children, .. }
        | BlockKind::FootnoteDefinition { children, .. } => {
            children.iter_mut().for_each(|c| repair_block(c, fixed))
        }
        _ => {}
    }
}
