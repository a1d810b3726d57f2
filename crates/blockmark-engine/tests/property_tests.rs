//! Property-based tests for blockmark-engine
//!
//! Uses proptest to check the editor invariants over generated documents,
//! selections and action sequences.

use std::ops::Range;

use blockmark_engine::editing::marks::{has_mark, toggle_mark};
use blockmark_engine::editing::{
    Action, BlockPatch, Direction, EditorState, ImageDataPatch, LogicalSelection,
};
use blockmark_engine::models::{
    Block, BlockId, BlockType, ImageAlignment, ImageData, ImageSize, Mark, MarkType,
};
use blockmark_engine::{PersistedBlock, blocks_from_persisted, blocks_to_persisted};
use proptest::prelude::*;
use proptest::sample::{Index, select};

const HREF: &str = "https://example.com";

/// Text with a mix of ASCII and multi-byte chars, so offsets must be char based
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ]{0,16}",
        "[a-zé漢 ]{1,8}",
        Just(String::new()),
    ]
}

fn arb_mark_type() -> impl Strategy<Value = MarkType> {
    select(MarkType::ALL.to_vec())
}

fn arb_text_type() -> impl Strategy<Value = BlockType> {
    select(
        BlockType::ALL
            .into_iter()
            .filter(BlockType::is_text)
            .collect::<Vec<_>>(),
    )
}

/// A range inside text of `len` chars, where `len` is non-zero
fn arb_range(len: usize) -> impl Strategy<Value = Range<usize>> {
    (0..len, 0..len).prop_map(|(a, b)| a.min(b)..a.max(b) + 1)
}

fn arb_mark(len: usize) -> impl Strategy<Value = Mark> {
    (arb_mark_type(), arb_range(len)).prop_map(|(mark_type, range)| match mark_type {
        MarkType::Link => Mark::link(range, HREF),
        _ => Mark::new(mark_type, range),
    })
}

fn arb_text_block() -> impl Strategy<Value = Block> {
    (arb_text_type(), arb_text())
        .prop_flat_map(|(block_type, text)| {
            let len = text.chars().count();
            let marks = if len == 0 {
                Just(Vec::new()).boxed()
            } else {
                prop::collection::vec(arb_mark(len), 0..4).boxed()
            };
            (Just(Block::text("pending", block_type, text)), marks)
        })
        .prop_map(|(block, marks)| block.with_marks(marks))
}

fn arb_image_block() -> impl Strategy<Value = Block> {
    let placeholder = Block {
        data: None,
        ..Block::image("pending", ImageData::default())
    };
    prop_oneof![
        3 => (
            "[a-z0-9-]{1,12}",
            "[a-zA-Z ]{0,10}",
            "[a-zA-Z ]{0,10}",
            select(vec![ImageAlignment::Left, ImageAlignment::Center, ImageAlignment::Full]),
            select(vec![ImageSize::Small, ImageSize::Medium, ImageSize::Large]),
        )
            .prop_map(|(asset_ref, alt_text, caption, alignment, size)| {
                Block::image(
                    "pending",
                    ImageData {
                        asset_ref,
                        alt_text,
                        caption,
                        alignment,
                        size,
                    },
                )
            }),
        1 => Just(placeholder),
    ]
}

/// A valid, non-empty document with ids `b0`, `b1`, ...
fn arb_blocks() -> impl Strategy<Value = Vec<Block>> {
    prop::collection::vec(prop_oneof![3 => arb_text_block(), 1 => arb_image_block()], 1..6)
        .prop_map(|blocks| {
            blocks
                .into_iter()
                .enumerate()
                .map(|(i, mut block)| {
                    block.id = BlockId::new(format!("b{i}"));
                    block
                })
                .collect()
        })
}

/// A text block together with a range inside it
fn arb_selected_block() -> impl Strategy<Value = (Block, Range<usize>)> {
    arb_text_block()
        .prop_filter("needs text to select", |block| !block.is_empty())
        .prop_flat_map(|block| {
            let len = block.len();
            (Just(block), arb_range(len))
        })
}

/// One user-level edit. Blocks are picked by position when the step runs,
/// so steps stay meaningful after ids change.
#[derive(Debug, Clone)]
enum Step {
    Focus(Index),
    Edit(Index, String),
    Resize(Index, ImageSize),
    Move(Index, Direction),
    Delete(Index),
    Duplicate(Index),
    Retype(Index, BlockType),
    Select(Index, Index, Index),
    Format(MarkType, bool),
    Insert(Option<Index>, BlockType),
}

fn arb_step() -> impl Strategy<Value = Step> {
    let direction = prop_oneof![Just(Direction::Up), Just(Direction::Down)];
    let size = select(vec![ImageSize::Small, ImageSize::Medium, ImageSize::Large]);
    let block_type = select(BlockType::ALL.to_vec());
    prop_oneof![
        1 => any::<Index>().prop_map(Step::Focus),
        1 => (any::<Index>(), arb_text()).prop_map(|(i, text)| Step::Edit(i, text)),
        1 => (any::<Index>(), size).prop_map(|(i, size)| Step::Resize(i, size)),
        1 => (any::<Index>(), direction).prop_map(|(i, direction)| Step::Move(i, direction)),
        1 => any::<Index>().prop_map(Step::Delete),
        1 => any::<Index>().prop_map(Step::Duplicate),
        1 => (any::<Index>(), block_type.clone()).prop_map(|(i, t)| Step::Retype(i, t)),
        3 => any::<(Index, Index, Index)>().prop_map(|(i, a, b)| Step::Select(i, a, b)),
        3 => (arb_mark_type(), any::<bool>()).prop_map(|(t, remove)| Step::Format(t, remove)),
        1 => (any::<Option<Index>>(), block_type).prop_map(|(i, t)| Step::Insert(i, t)),
    ]
}

fn to_action(state: &EditorState, step: Step) -> Action {
    let blocks = state.blocks();
    let id_at = |index: Index| blocks[index.index(blocks.len())].id.clone();

    match step {
        Step::Focus(i) => Action::SetFocus { block_id: id_at(i) },
        Step::Edit(i, text) => Action::UpdateBlock {
            block_id: id_at(i),
            patch: BlockPatch::content(text),
        },
        Step::Resize(i, size) => Action::UpdateBlock {
            block_id: id_at(i),
            patch: BlockPatch::data(ImageDataPatch::size(size)),
        },
        Step::Move(i, direction) => Action::MoveBlock {
            block_id: id_at(i),
            direction,
        },
        Step::Delete(i) => Action::DeleteBlock { block_id: id_at(i) },
        Step::Duplicate(i) => Action::DuplicateBlock { block_id: id_at(i) },
        Step::Retype(i, block_type) => Action::ChangeBlockType {
            block_id: id_at(i),
            block_type,
        },
        Step::Select(i, a, b) => {
            let block = &blocks[i.index(blocks.len())];
            let (a, b) = (a.index(block.len() + 1), b.index(block.len() + 1));
            Action::SetSelection {
                selection: LogicalSelection::new(block.id.clone(), a.min(b), a.max(b)),
            }
        }
        Step::Format(mark_type, true) => Action::RemoveMark { mark_type },
        Step::Format(mark_type, false) => Action::ApplyMark {
            mark_type,
            href: (mark_type == MarkType::Link).then(|| HREF.to_string()),
        },
        Step::Insert(replace, BlockType::Image) => Action::InsertImageBlock {
            asset_ref: "image-new".to_string(),
            alt_text: String::new(),
            replace_block_id: replace.map(id_at),
        },
        Step::Insert(after, block_type) => Action::InsertBlock {
            after: after.map(id_at),
            block_type,
        },
    }
}

fn sorted_by_id(mut blocks: Vec<Block>) -> Vec<Block> {
    blocks.sort_by(|x, y| x.id.cmp(&y.id));
    blocks
}

proptest! {
    /// Image blocks never gain marks or text, whatever the edit
    #[test]
    fn test_image_blocks_never_carry_marks(
        blocks in arb_blocks(),
        steps in prop::collection::vec(arb_step(), 0..40),
    ) {
        let mut state = EditorState::new(blocks)?;

        for step in steps {
            let action = to_action(&state, step);
            state.apply(action);

            for block in state.blocks().iter().filter(|b| b.is_image()) {
                prop_assert!(block.marks.is_empty(), "image {} gained marks", block.id);
                prop_assert!(block.content.is_empty(), "image {} gained text", block.id);
            }
        }
    }

    /// Every reachable state is a valid, storable document
    #[test]
    fn test_every_state_keeps_model_invariants(
        blocks in arb_blocks(),
        steps in prop::collection::vec(arb_step(), 0..40),
    ) {
        let mut state = EditorState::new(blocks)?;

        for step in steps {
            let action = to_action(&state, step);
            state.apply(action);

            prop_assert!(!state.blocks().is_empty());
            for block in state.blocks() {
                block.validate()?;
            }
            let mut ids: Vec<&BlockId> = state.blocks().iter().map(|b| &b.id).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), state.blocks().len(), "duplicate block ids");
            if let Some(focused) = state.focused_block_id() {
                prop_assert!(state.block(focused).is_some(), "focus on missing block {}", focused);
            }

            let restored = blocks_from_persisted(blocks_to_persisted(state.blocks()))?;
            prop_assert_eq!(restored.as_slice(), state.blocks());
        }
    }

    #[test]
    fn test_persisted_json_round_trip_is_identity(blocks in arb_blocks()) {
        let json = serde_json::to_string(&blocks_to_persisted(&blocks))?;
        let stored: Vec<PersistedBlock> = serde_json::from_str(&json)?;

        let restored = blocks_from_persisted(stored)?;

        prop_assert_eq!(restored, blocks);
    }

    /// Toggling twice over a range no mark covers yet restores the block
    #[test]
    fn test_toggle_mark_is_an_involution(
        (block, range) in arb_selected_block(),
        mark_type in arb_mark_type(),
    ) {
        prop_assume!(!has_mark(&block, mark_type, &range));
        let href = (mark_type == MarkType::Link).then_some(HREF);

        let once = toggle_mark(&block, mark_type, range.clone(), href);
        prop_assert!(has_mark(&once, mark_type, &range));

        let twice = toggle_mark(&once, mark_type, range.clone(), href);
        prop_assert!(!has_mark(&twice, mark_type, &range));
        prop_assert_eq!(twice, block);
    }

    #[test]
    fn test_move_block_preserves_blocks(
        blocks in arb_blocks(),
        index in any::<Index>(),
        up in any::<bool>(),
    ) {
        let mut state = EditorState::new(blocks.clone())?;
        let block_id = blocks[index.index(blocks.len())].id.clone();
        let direction = if up { Direction::Up } else { Direction::Down };

        state.apply(Action::MoveBlock { block_id, direction });

        prop_assert_eq!(sorted_by_id(state.blocks().to_vec()), sorted_by_id(blocks));
    }
}
