use crate::editing::{LogicalSelection, ScreenPoint};
use crate::models::{BlockId, BlockType, ImageAlignment, ImageData, ImageSize, MarkType};

/// Direction for `Action::MoveBlock`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Partial update of image metadata; `None` fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDataPatch {
    pub asset_ref: Option<String>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub alignment: Option<ImageAlignment>,
    pub size: Option<ImageSize>,
}

impl ImageDataPatch {
    pub fn alignment(alignment: ImageAlignment) -> Self {
        Self {
            alignment: Some(alignment),
            ..Self::default()
        }
    }

    pub fn size(size: ImageSize) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub(crate) fn merge_into(&self, data: &mut ImageData) {
        if let Some(asset_ref) = &self.asset_ref {
            data.asset_ref = asset_ref.clone();
        }
        if let Some(alt_text) = &self.alt_text {
            data.alt_text = alt_text.clone();
        }
        if let Some(caption) = &self.caption {
            data.caption = caption.clone();
        }
        if let Some(alignment) = self.alignment {
            data.alignment = alignment;
        }
        if let Some(size) = self.size {
            data.size = size;
        }
    }
}

/// Partial update of a block for `Action::UpdateBlock`.
///
/// Content only applies to text blocks and data only to image blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPatch {
    pub content: Option<String>,
    pub data: Option<ImageDataPatch>,
}

impl BlockPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            data: None,
        }
    }

    pub fn data(data: ImageDataPatch) -> Self {
        Self {
            content: None,
            data: Some(data),
        }
    }
}

/// The closed set of transitions the editor state accepts
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetFocus {
        block_id: BlockId,
    },
    ClearFocus,
    UpdateBlock {
        block_id: BlockId,
        patch: BlockPatch,
    },
    MoveBlock {
        block_id: BlockId,
        direction: Direction,
    },
    DeleteBlock {
        block_id: BlockId,
    },
    DuplicateBlock {
        block_id: BlockId,
    },
    ChangeBlockType {
        block_id: BlockId,
        block_type: BlockType,
    },
    /// Toggle a mark over the current selection
    ApplyMark {
        mark_type: MarkType,
        href: Option<String>,
    },
    /// Remove the mark covering the current selection, if one does
    RemoveMark {
        mark_type: MarkType,
    },
    ShowInlineToolbar {
        anchor: ScreenPoint,
    },
    HideInlineToolbar,
    SetSelection {
        selection: Option<LogicalSelection>,
    },
    ToggleOutline,
    ShowImageUploadModal {
        target_block_id: Option<BlockId>,
    },
    HideImageUploadModal,
    InsertImageBlock {
        asset_ref: String,
        alt_text: String,
        replace_block_id: Option<BlockId>,
    },
    InsertBlock {
        after: Option<BlockId>,
        block_type: BlockType,
    },
}
