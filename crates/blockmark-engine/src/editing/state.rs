use crate::editing::{Action, LogicalSelection, Patch, ScreenPoint};
use crate::models::{Block, BlockId, Document, ModelError};

/// Floating inline-formatting toolbar
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InlineToolbar {
    pub visible: bool,
    pub anchor: ScreenPoint,
}

/// Image upload dialog and the block it will replace, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageUploadModal {
    pub visible: bool,
    pub target_block_id: Option<BlockId>,
}

/// The full editable state of one open document.
///
/// Created once per document load and mutated only through [`Action`]s via
/// [`EditorState::apply`]. The state holds no persistence of its own; a save
/// collaborator watches [`Patch::content_changed`] and reads
/// [`EditorState::blocks`].
///
/// ```rust
/// use blockmark_engine::editing::{Action, EditorState, LogicalSelection};
/// use blockmark_engine::models::{Block, BlockType, MarkType};
///
/// let mut state =
///     EditorState::new(vec![Block::text("p1", BlockType::Paragraph, "Hello world")]).unwrap();
/// state.apply(Action::SetSelection {
///     selection: LogicalSelection::new("p1", 0, 5),
/// });
/// let patch = state.apply(Action::ApplyMark { mark_type: MarkType::Strong, href: None });
///
/// assert!(patch.content_changed);
/// assert_eq!(state.blocks()[0].marks.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub(crate) document: Document,
    pub(crate) focused_block_id: Option<BlockId>,
    pub(crate) selection: Option<LogicalSelection>,
    pub(crate) inline_toolbar: InlineToolbar,
    pub(crate) outline_visible: bool,
    pub(crate) image_upload_modal: ImageUploadModal,
    /// Incremented on every applied action
    pub(crate) version: u64,
}

impl EditorState {
    /// Start an editing session over `blocks` in the idle configuration
    pub fn new(blocks: Vec<Block>) -> Result<Self, ModelError> {
        Ok(Self::from_document(Document::new(blocks)?))
    }

    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            focused_block_id: None,
            selection: None,
            inline_toolbar: InlineToolbar::default(),
            outline_visible: false,
            image_upload_modal: ImageUploadModal::default(),
            version: 0,
        }
    }

    /// Apply an action in place, reporting what changed
    pub fn apply(&mut self, action: Action) -> Patch {
        crate::editing::reducer::apply_action(self, action)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn blocks(&self) -> &[Block] {
        self.document.blocks()
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.document.get(id)
    }

    pub fn focused_block_id(&self) -> Option<&BlockId> {
        self.focused_block_id.as_ref()
    }

    pub fn focused_block(&self) -> Option<&Block> {
        self.focused_block_id.as_ref().and_then(|id| self.block(id))
    }

    pub fn selection(&self) -> Option<&LogicalSelection> {
        self.selection.as_ref()
    }

    pub fn inline_toolbar(&self) -> InlineToolbar {
        self.inline_toolbar
    }

    pub fn outline_visible(&self) -> bool {
        self.outline_visible
    }

    pub fn image_upload_modal(&self) -> &ImageUploadModal {
        &self.image_upload_modal
    }

    /// Modal open: callers should suppress other interaction
    pub fn is_modal_open(&self) -> bool {
        self.image_upload_modal.visible
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Pure transition: the state `action` leads to, leaving `state` untouched
pub fn reduce(state: &EditorState, action: Action) -> EditorState {
    let mut next = state.clone();
    next.apply(action);
    next
}
