pub mod editing;
pub mod io;
pub mod models;
pub mod persist;

// Re-export key types for easier usage
pub use editing::{Action, EditorSession, EditorState, Patch, Snapshot};
pub use io::*;
pub use models::{Block, BlockId, BlockType, Document, ImageData, Mark, MarkType, ModelError};
pub use persist::{PersistError, PersistedBlock, blocks_from_persisted, blocks_to_persisted};
