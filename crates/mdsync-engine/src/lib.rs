pub mod context;
pub mod error;
pub mod model;
pub mod parsing;
pub mod position;
pub mod serialize;
pub mod sync;

// Re-export key types for easier usage
pub use context::{
    ContextLimits, CursorContext, compute_context, compute_context_for_selection,
    compute_context_with,
};
pub use error::{ParseError, SerializeError, StalePosition, StructuralError};
pub use model::{Block, BlockKind, Document, Inline, InlineKind, Mark, Marks, NodePath, Span};
pub use parsing::{ParseOptions, YieldingParse, parse, parse_rope};
pub use position::{TreeLocation, to_text_offset, to_tree_location};
pub use serialize::{
    HardBreakStyle, SerializeOptions, Serialized, serialize, serialize_tracked, serialize_with_spans,
};
pub use sync::{SyncConfig, SyncController, SyncEffect, SyncPhase};
