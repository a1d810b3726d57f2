//! Selection mapping between platform text selections and logical
//! `(block, start, end)` coordinates.
//!
//! The platform side is abstracted behind [`SelectionSource`]: it reports the
//! current native selection as opaque text-node handles plus offsets, and
//! lists the text runs each block container renders. Offsets are found by
//! walking a block's runs in order and summing the lengths of the runs that
//! precede the boundary node, so inline wrappers (bold spans, links) split
//! the text without affecting the logical offset.
//!
//! Selections crossing block boundaries are not mapped: formatting always
//! operates inside a single block's text.

use std::ops::Range;

use crate::models::BlockId;

/// Default distance between the top of the selection and the toolbar anchor
pub const DEFAULT_TOOLBAR_OFFSET: f64 = 10.0;

/// A non-collapsed range inside one block, in char offsets
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalSelection {
    pub block_id: BlockId,
    pub start: usize,
    pub end: usize,
}

impl LogicalSelection {
    /// Returns `None` for collapsed or inverted ranges
    pub fn new(block_id: impl Into<BlockId>, start: usize, end: usize) -> Option<Self> {
        (start < end).then(|| Self {
            block_id: block_id.into(),
            start,
            end,
        })
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Opaque handle to a rendered text node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// A boundary point of a native selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativePoint {
    pub node: NodeId,
    pub offset: usize,
}

/// Screen-space rectangle, origin top-left
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Screen-space point used to position floating UI
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// The platform's current selection as reported at event time
#[derive(Debug, Clone, PartialEq)]
pub struct NativeSelection {
    pub anchor: NativePoint,
    pub focus: NativePoint,
    /// Bounding rectangle of the selected text, if laid out
    pub bounds: Option<Rect>,
}

impl NativeSelection {
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// One rendered text node inside a block container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub node: NodeId,
    /// Length of the node's text in chars
    pub len: usize,
}

/// Platform capability the mapper reads from
pub trait SelectionSource {
    fn current_selection(&self) -> Option<NativeSelection>;

    /// Block container a text node is rendered inside, if any
    fn container_of(&self, node: NodeId) -> Option<BlockId>;

    /// Text runs of a block container in reading order
    fn text_runs(&self, block_id: &BlockId) -> Vec<TextRun>;
}

/// Result of reading a native selection
#[derive(Debug, Clone, PartialEq)]
pub struct MappedSelection {
    pub selection: LogicalSelection,
    pub anchor: Option<ScreenPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionMapper {
    toolbar_offset: f64,
}

impl Default for SelectionMapper {
    fn default() -> Self {
        Self::new(DEFAULT_TOOLBAR_OFFSET)
    }
}

impl SelectionMapper {
    pub fn new(toolbar_offset: f64) -> Self {
        Self { toolbar_offset }
    }

    /// Read the current native selection and map it into logical coordinates
    /// plus a toolbar anchor. `None` covers every unresolvable case.
    pub fn read(&self, source: &impl SelectionSource) -> Option<MappedSelection> {
        let native = source.current_selection()?;
        let selection = native_to_logical(source, &native)?;
        let anchor = native.bounds.map(|rect| self.toolbar_anchor(&rect));
        Some(MappedSelection { selection, anchor })
    }

    /// Horizontal center of `rect`, slightly above its top edge
    pub fn toolbar_anchor(&self, rect: &Rect) -> ScreenPoint {
        ScreenPoint {
            x: rect.x + rect.width / 2.0,
            y: rect.y - self.toolbar_offset,
        }
    }
}

/// Map a native selection onto a single block's text
pub fn native_to_logical(
    source: &impl SelectionSource,
    native: &NativeSelection,
) -> Option<LogicalSelection> {
    if native.is_collapsed() {
        return None;
    }

    let block_id = source.container_of(native.anchor.node)?;
    let focus_block = source.container_of(native.focus.node)?;
    if block_id != focus_block {
        return None;
    }

    let runs = source.text_runs(&block_id);
    let anchor = offset_in_runs(&runs, &native.anchor)?;
    let focus = offset_in_runs(&runs, &native.focus)?;

    LogicalSelection::new(block_id, anchor.min(focus), anchor.max(focus))
}

/// Offset of `point` from the start of the block: the length of all text
/// preceding the boundary node plus the offset inside it
fn offset_in_runs(runs: &[TextRun], point: &NativePoint) -> Option<usize> {
    let mut prefix = 0;
    for run in runs {
        if run.node == point.node {
            return Some(prefix + point.offset.min(run.len));
        }
        prefix += run.len;
    }
    None
}
