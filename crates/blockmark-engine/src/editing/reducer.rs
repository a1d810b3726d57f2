//! State transitions for every [`Action`].
//!
//! Each transition either applies completely and bumps the state version, or
//! declines and leaves the state untouched. References to unknown block ids
//! are declined rather than treated as errors: focus and selection can
//! legitimately point at a block that was just removed.

use crate::editing::marks::{self, clip_marks};
use crate::editing::{
    Action, BlockPatch, Direction, EditorState, LogicalSelection, Patch, ScreenPoint,
};
use crate::models::{Block, BlockId, BlockType, ImageData, MarkType, char_len};

pub(crate) fn apply_action(state: &mut EditorState, action: Action) -> Patch {
    let outcome = match action {
        Action::SetFocus { block_id } => set_focus(state, block_id),
        Action::ClearFocus => clear_focus(state),
        Action::UpdateBlock { block_id, patch } => update_block(state, &block_id, patch),
        Action::MoveBlock {
            block_id,
            direction,
        } => move_block(state, &block_id, direction),
        Action::DeleteBlock { block_id } => delete_block(state, &block_id),
        Action::DuplicateBlock { block_id } => duplicate_block(state, &block_id),
        Action::ChangeBlockType {
            block_id,
            block_type,
        } => change_block_type(state, &block_id, block_type),
        Action::ApplyMark { mark_type, href } => toggle_mark(state, mark_type, href.as_deref()),
        Action::RemoveMark { mark_type } => remove_mark(state, mark_type),
        Action::ShowInlineToolbar { anchor } => show_inline_toolbar(state, anchor),
        Action::HideInlineToolbar => {
            state.inline_toolbar.visible = false;
            Some(Patch::default())
        }
        Action::SetSelection { selection } => {
            state.selection = selection;
            Some(Patch::default())
        }
        Action::ToggleOutline => {
            state.outline_visible = !state.outline_visible;
            Some(Patch::default())
        }
        Action::ShowImageUploadModal { target_block_id } => {
            state.image_upload_modal.visible = true;
            state.image_upload_modal.target_block_id = target_block_id;
            state.selection = None;
            state.inline_toolbar.visible = false;
            Some(Patch::default())
        }
        Action::HideImageUploadModal => {
            state.image_upload_modal.visible = false;
            state.image_upload_modal.target_block_id = None;
            Some(Patch::default())
        }
        Action::InsertImageBlock {
            asset_ref,
            alt_text,
            replace_block_id,
        } => insert_image_block(state, asset_ref, alt_text, replace_block_id),
        Action::InsertBlock { after, block_type } => insert_block(state, after, block_type),
    };

    match outcome {
        Some(mut patch) => {
            state.version += 1;
            patch.applied = true;
            patch.version = state.version;
            patch
        }
        None => Patch::ignored(state.version),
    }
}

fn set_focus(state: &mut EditorState, block_id: BlockId) -> Option<Patch> {
    if !state.document.contains(&block_id) {
        log::debug!("set_focus: unknown block {block_id}");
        return None;
    }
    state.focused_block_id = Some(block_id);
    clear_selection(state);
    Some(Patch::default())
}

fn clear_focus(state: &mut EditorState) -> Option<Patch> {
    state.focused_block_id = None;
    clear_selection(state);
    Some(Patch::default())
}

fn update_block(state: &mut EditorState, block_id: &BlockId, patch: BlockPatch) -> Option<Patch> {
    let Some(block) = state.document.get_mut(block_id) else {
        log::debug!("update_block: unknown block {block_id}");
        return None;
    };
    let before = block.clone();

    if block.is_image() {
        match (&patch.data, block.data.as_mut()) {
            (Some(data_patch), Some(data)) => data_patch.merge_into(data),
            (Some(_), None) => {
                log::debug!("update_block: placeholder image {block_id} has no asset to adjust");
            }
            (None, _) => {}
        }
    } else if let Some(content) = patch.content {
        let len = char_len(&content);
        block.marks = clip_marks(&block.marks, len);
        block.content = content;
    }

    if *block == before {
        return None;
    }

    let len = block.len();
    if state
        .selection
        .as_ref()
        .is_some_and(|sel| &sel.block_id == block_id && sel.end > len)
    {
        clear_selection(state);
    }

    Some(changed(vec![block_id.clone()]))
}

fn move_block(state: &mut EditorState, block_id: &BlockId, direction: Direction) -> Option<Patch> {
    let index = state.document.index_of(block_id)?;
    let neighbour = match direction {
        Direction::Up if index > 0 => index - 1,
        Direction::Down if index + 1 < state.document.len() => index + 1,
        _ => {
            log::debug!("move_block: {block_id} already at {direction:?} boundary");
            return None;
        }
    };

    let neighbour_id = state.document.blocks()[neighbour].id.clone();
    state.document.swap(index, neighbour);
    Some(Patch {
        content_changed: true,
        changed: vec![block_id.clone(), neighbour_id],
        ..Patch::default()
    })
}

fn delete_block(state: &mut EditorState, block_id: &BlockId) -> Option<Patch> {
    let index = state.document.index_of(block_id)?;
    let Some(removed) = state.document.remove(index) else {
        log::debug!("delete_block: refusing to delete the only block {block_id}");
        return None;
    };

    if state.focused_block_id.as_ref() == Some(&removed.id) {
        // Previous sibling, else the block that slid into this index
        let successor = index.checked_sub(1).unwrap_or(index);
        state.focused_block_id = state
            .document
            .blocks()
            .get(successor)
            .map(|b| b.id.clone());
    }
    forget_block(state, &removed.id);

    Some(Patch {
        content_changed: true,
        removed: vec![removed.id],
        ..Patch::default()
    })
}

fn duplicate_block(state: &mut EditorState, block_id: &BlockId) -> Option<Patch> {
    let index = state.document.index_of(block_id)?;
    let copy = Block {
        id: BlockId::generate(),
        ..state.document.blocks()[index].clone()
    };
    let copy_id = copy.id.clone();
    state.document.insert(index + 1, copy);

    Some(Patch {
        content_changed: true,
        inserted: vec![copy_id],
        ..Patch::default()
    })
}

fn change_block_type(
    state: &mut EditorState,
    block_id: &BlockId,
    block_type: BlockType,
) -> Option<Patch> {
    let block = state.document.get_mut(block_id)?;
    if block.block_type == block_type {
        return None;
    }

    match (block.is_image(), block_type.is_text()) {
        // Image to text: drop image metadata
        (true, true) => block.data = None,
        // Text to image: drop text and formatting
        (false, false) => {
            block.content.clear();
            block.marks.clear();
        }
        _ => {}
    }
    block.block_type = block_type;

    if !block_type.is_text()
        && state
            .selection
            .as_ref()
            .is_some_and(|sel| &sel.block_id == block_id)
    {
        clear_selection(state);
    }

    Some(changed(vec![block_id.clone()]))
}

fn toggle_mark(state: &mut EditorState, mark_type: MarkType, href: Option<&str>) -> Option<Patch> {
    let (block, selection) = selected_block(state)?;
    let updated = marks::toggle_mark(block, mark_type, selection.range(), href);
    commit_marks(state, updated)
}

fn remove_mark(state: &mut EditorState, mark_type: MarkType) -> Option<Patch> {
    let (block, selection) = selected_block(state)?;
    let updated = marks::remove_mark(block, mark_type, selection.range());
    commit_marks(state, updated)
}

/// The block under the current selection, if both resolve
fn selected_block(state: &EditorState) -> Option<(&Block, &LogicalSelection)> {
    let selection = state.selection.as_ref()?;
    match state.document.get(&selection.block_id) {
        Some(block) => Some((block, selection)),
        None => {
            log::debug!("mark action: selection points at unknown block {}", selection.block_id);
            None
        }
    }
}

fn commit_marks(state: &mut EditorState, updated: Block) -> Option<Patch> {
    let block = state.document.get_mut(&updated.id)?;
    if *block == updated {
        return None;
    }
    let id = updated.id.clone();
    *block = updated;
    Some(changed(vec![id]))
}

fn show_inline_toolbar(state: &mut EditorState, anchor: ScreenPoint) -> Option<Patch> {
    if state.image_upload_modal.visible {
        log::debug!("show_inline_toolbar: image upload modal is open");
        return None;
    }
    state.inline_toolbar.visible = true;
    state.inline_toolbar.anchor = anchor;
    Some(Patch::default())
}

fn insert_image_block(
    state: &mut EditorState,
    asset_ref: String,
    alt_text: String,
    replace_block_id: Option<BlockId>,
) -> Option<Patch> {
    let image = Block::image(BlockId::generate(), ImageData::new(asset_ref, alt_text));
    let image_id = image.id.clone();
    let mut patch = Patch {
        content_changed: true,
        inserted: vec![image_id.clone()],
        ..Patch::default()
    };

    let replace_index = replace_block_id
        .as_ref()
        .and_then(|id| state.document.index_of(id));
    match replace_index {
        Some(index) => {
            let replaced = state.document.replace(index, image)?;
            forget_block(state, &replaced.id);
            patch.removed.push(replaced.id);
        }
        None => {
            let index = insertion_index(state);
            state.document.insert(index, image);
        }
    }

    state.focused_block_id = Some(image_id);
    Some(patch)
}

fn insert_block(
    state: &mut EditorState,
    after: Option<BlockId>,
    block_type: BlockType,
) -> Option<Patch> {
    let index = match after {
        Some(id) => state.document.index_of(&id)? + 1,
        None => state.document.len(),
    };
    let block = Block::empty(block_type);
    let block_id = block.id.clone();
    state.document.insert(index, block);
    state.focused_block_id = Some(block_id.clone());
    clear_selection(state);

    Some(Patch {
        content_changed: true,
        inserted: vec![block_id],
        ..Patch::default()
    })
}

/// After the focused block, or at the end when nothing is focused
fn insertion_index(state: &EditorState) -> usize {
    state
        .focused_block_id
        .as_ref()
        .and_then(|id| state.document.index_of(id))
        .map(|i| i + 1)
        .unwrap_or(state.document.len())
}

/// Drop selection and modal references to a block that no longer exists
fn forget_block(state: &mut EditorState, block_id: &BlockId) {
    if state
        .selection
        .as_ref()
        .is_some_and(|sel| &sel.block_id == block_id)
    {
        clear_selection(state);
    }
    if state.focused_block_id.as_ref() == Some(block_id) {
        state.focused_block_id = None;
    }
    if state.image_upload_modal.target_block_id.as_ref() == Some(block_id) {
        state.image_upload_modal.target_block_id = None;
    }
}

fn clear_selection(state: &mut EditorState) {
    state.selection = None;
    state.inline_toolbar.visible = false;
}

fn changed(ids: Vec<BlockId>) -> Patch {
    Patch {
        content_changed: true,
        changed: ids,
        ..Patch::default()
    }
}
