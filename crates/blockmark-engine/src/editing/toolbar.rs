//! Derived toolbar views.
//!
//! Nothing here is stored: every view is recomputed from [`EditorState`] so
//! toolbar visibility and enabled affordances cannot drift from the state.

use crate::editing::marks::{active_marks, covering_mark};
use crate::editing::{Action, BlockPatch, Direction, EditorState, ImageDataPatch, ScreenPoint};
use crate::models::{BlockId, BlockType, ImageAlignment, ImageData, ImageSize, MarkType};

/// What the floating inline toolbar should show
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolbarView {
    pub visible: bool,
    pub anchor: ScreenPoint,
    /// Mark types covering the whole selection (pressed buttons)
    pub active_marks: Vec<MarkType>,
    /// Target of the link covering the selection, for the link editor
    pub link_href: Option<String>,
}

/// Inline toolbar projection of the editor state.
///
/// Visible only when the toolbar was shown, the selection resolves to an
/// existing text block and no modal is open.
pub fn derive_toolbar_visibility(state: &EditorState) -> ToolbarView {
    let toolbar = state.inline_toolbar();
    if !toolbar.visible || state.is_modal_open() {
        return ToolbarView::default();
    }

    let Some(selection) = state.selection() else {
        return ToolbarView::default();
    };
    let Some(block) = state.block(&selection.block_id) else {
        return ToolbarView::default();
    };
    let range = selection.range();
    if block.is_image() || range.end > block.len() {
        return ToolbarView::default();
    }

    ToolbarView {
        visible: true,
        anchor: toolbar.anchor,
        active_marks: active_marks(block, &range),
        link_href: covering_mark(block, MarkType::Link, &range).and_then(|m| m.href.clone()),
    }
}

/// Affordances of the block-level toolbar for one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockActions {
    pub block_id: BlockId,
    pub index: usize,
    pub can_move_up: bool,
    pub can_move_down: bool,
    pub can_delete: bool,
    /// Types the block can be converted to (every type but its own)
    pub retype_targets: Vec<BlockType>,
    /// Present for image blocks only
    pub image_options: Option<ImageOptions>,
}

impl BlockActions {
    /// Action for a move, or `None` when the block sits at that boundary
    pub fn move_action(&self, direction: Direction) -> Option<Action> {
        let allowed = match direction {
            Direction::Up => self.can_move_up,
            Direction::Down => self.can_move_down,
        };
        allowed.then(|| Action::MoveBlock {
            block_id: self.block_id.clone(),
            direction,
        })
    }

    pub fn delete_action(&self) -> Option<Action> {
        self.can_delete.then(|| Action::DeleteBlock {
            block_id: self.block_id.clone(),
        })
    }

    pub fn retype_action(&self, block_type: BlockType) -> Option<Action> {
        self.retype_targets
            .contains(&block_type)
            .then(|| Action::ChangeBlockType {
                block_id: self.block_id.clone(),
                block_type,
            })
    }
}

pub fn block_actions(state: &EditorState, block_id: &BlockId) -> Option<BlockActions> {
    let index = state.document().index_of(block_id)?;
    let block = &state.blocks()[index];
    let len = state.blocks().len();

    Some(BlockActions {
        block_id: block_id.clone(),
        index,
        can_move_up: index > 0,
        can_move_down: index + 1 < len,
        can_delete: len > 1,
        retype_targets: BlockType::ALL
            .into_iter()
            .filter(|t| *t != block.block_type)
            .collect(),
        // Placeholders have nothing to align until an asset is uploaded
        image_options: block
            .data
            .as_ref()
            .map(|data| ImageOptions::for_block(block_id.clone(), data)),
    })
}

/// Block toolbar for the focused block, if any
pub fn focused_block_actions(state: &EditorState) -> Option<BlockActions> {
    block_actions(state, state.focused_block_id()?)
}

/// Alignment and size controls of an image block.
///
/// These are block metadata updated through `Action::UpdateBlock`, never
/// inline marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    pub block_id: BlockId,
    pub alignment: ImageAlignment,
    pub size: ImageSize,
}

impl ImageOptions {
    pub const ALIGNMENTS: [ImageAlignment; 3] = [
        ImageAlignment::Left,
        ImageAlignment::Center,
        ImageAlignment::Full,
    ];
    pub const SIZES: [ImageSize; 3] = [ImageSize::Small, ImageSize::Medium, ImageSize::Large];

    fn for_block(block_id: BlockId, data: &ImageData) -> Self {
        Self {
            block_id,
            alignment: data.alignment,
            size: data.size,
        }
    }

    pub fn width_percent(&self) -> u8 {
        self.size.width_percent()
    }

    pub fn set_alignment(&self, alignment: ImageAlignment) -> Action {
        Action::UpdateBlock {
            block_id: self.block_id.clone(),
            patch: BlockPatch::data(ImageDataPatch::alignment(alignment)),
        }
    }

    pub fn set_size(&self, size: ImageSize) -> Action {
        Action::UpdateBlock {
            block_id: self.block_id.clone(),
            patch: BlockPatch::data(ImageDataPatch::size(size)),
        }
    }
}
