use thiserror::Error;

use crate::model::{NodePath, Span};

/// A tree violates a document-model invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("heading level {level} is outside 1..=6")]
    HeadingLevel { level: u8 },
    #[error("table has no columns")]
    EmptyTable,
    #[error("table row {row} has {found} cells, expected {expected}")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("code fence info string {0:?} cannot be written on a fence line")]
    InvalidFenceInfo(String),
}

impl StructuralError {
    /// Repairable violations are fixed in place; the rest abort serialization.
    pub fn is_repairable(&self) -> bool {
        matches!(self, StructuralError::ColumnMismatch { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parse cancelled after {consumed} of {total} lines")]
    Cancelled { consumed: usize, total: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializeError {
    #[error("cannot serialize document: {0}")]
    Structural(#[from] StructuralError),
}

/// A caret could not be mapped because the tree no longer matches its text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StalePosition {
    #[error("offset {offset} is outside the document span {span:?}")]
    Offset { offset: usize, span: Option<Span> },
    #[error("node path {0:?} has no span in the current tree")]
    Node(NodePath),
}
