pub mod block;
pub mod document;
pub mod mark;

pub use block::*;
pub use document::*;
pub use mark::*;

/// Construction-time invariant violations in the document model.
///
/// These indicate malformed input data and are never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid block {id}: {reason}")]
    InvalidBlock { id: BlockId, reason: String },
    #[error("Duplicate block id: {0}")]
    DuplicateBlockId(BlockId),
}
