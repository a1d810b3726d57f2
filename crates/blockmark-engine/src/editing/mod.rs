/*!
 * # Editing Core
 *
 * The editable state of one open document and everything that drives it.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: `EditorState`
 * - One state per open document: the blocks, focus, logical selection,
 *   inline toolbar, outline toggle and image upload modal
 * - Mutated only through the closed [`Action`] set via [`EditorState::apply`]
 * - Every applied action bumps a version counter and returns a [`Patch`]
 *
 * ### 2. Marks as Value Objects
 * - Formatting lives as `(type, start, end)` spans over plain block text
 * - `marks::toggle_mark` replaces a block; it never mutates one in place
 *
 * ### 3. Surfaces Behind Traits
 * - The platform selection is read through [`SelectionSource`]
 * - Link URLs come from a [`LinkPrompt`], image bytes go to an [`AssetUploader`]
 * - The [`InteractionController`] turns raw key and selection events into actions
 *
 * ### 4. Read API: Derived Views
 * - Toolbar visibility, block affordances and the [`Snapshot`] grouping are
 *   recomputed from state and never stored
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockmark_engine::editing::*;
 * use blockmark_engine::models::{Block, BlockType};
 *
 * let mut state = EditorState::new(vec![
 *     Block::text("h", BlockType::Heading2, "Intro"),
 *     Block::text("p", BlockType::Paragraph, "Hello world"),
 * ])
 * .unwrap();
 *
 * let patch = state.apply(Action::DuplicateBlock { block_id: "p".into() });
 * assert_eq!(patch.inserted.len(), 1);
 *
 * let snapshot = state.snapshot();
 * assert_eq!(snapshot.outline.len(), 1);
 * assert_eq!(snapshot.groups.len(), 3);
 * ```
 */

pub mod actions;
pub mod controller;
pub mod marks;
pub mod patch;
mod reducer;
pub mod selection;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod toolbar;
pub mod upload;

pub use actions::{Action, BlockPatch, Direction, ImageDataPatch};
pub use controller::{
    EventOutcome, InteractionController, Key, KeyPress, LinkPrompt, Modifiers, Platform, Shortcut,
    normalize_link_url, resolve_shortcut,
};
pub use marks::{has_mark, toggle_mark};
pub use patch::Patch;
pub use selection::{
    DEFAULT_TOOLBAR_OFFSET, LogicalSelection, MappedSelection, NativePoint, NativeSelection, NodeId,
    Rect, ScreenPoint, SelectionMapper, SelectionSource, TextRun, native_to_logical,
};
pub use session::{EditorEvent, EditorHost, EditorSession};
pub use snapshot::{ContentGroup, OutlineEntry, Snapshot};
pub use state::{EditorState, ImageUploadModal, InlineToolbar, reduce};
pub use toolbar::{
    BlockActions, ImageOptions, ToolbarView, block_actions, derive_toolbar_visibility,
    focused_block_actions,
};
pub use upload::{
    ALLOWED_MIME_TYPES, AssetUploader, MAX_UPLOAD_BYTES, StoredAsset, UploadError, UploadFile,
    UploadLimits, submit_image_upload,
};
