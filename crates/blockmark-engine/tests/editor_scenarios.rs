use blockmark_engine::editing::marks::{has_mark, toggle_mark};
use blockmark_engine::blocks_to_persisted;
use blockmark_engine::editing::{Action, BlockPatch, EditorState, ImageDataPatch, LogicalSelection};
use blockmark_engine::models::{Block, BlockId, BlockType, ImageSize, Mark, MarkType};
use pretty_assertions::assert_eq;

fn para(id: &str, text: &str) -> Block {
    Block::text(id, BlockType::Paragraph, text)
}

fn ids(state: &EditorState) -> Vec<String> {
    state.blocks().iter().map(|b| b.id.to_string()).collect()
}

#[test]
fn test_has_mark_follows_add_and_remove() {
    let block = para("p", "Hello world");

    let added = toggle_mark(&block, MarkType::Underline, 2..8, None);
    assert!(has_mark(&added, MarkType::Underline, &(2..8)));
    assert!(has_mark(&added, MarkType::Underline, &(3..4)));

    let removed = toggle_mark(&added, MarkType::Underline, 2..8, None);
    assert!(!has_mark(&removed, MarkType::Underline, &(2..8)));
}

#[test]
fn test_hello_world_strong_scenarios() {
    // Given "Hello world" with "Hello" selected
    let mut state = EditorState::new(vec![para("p1", "Hello world")]).unwrap();
    state.apply(Action::SetSelection {
        selection: LogicalSelection::new("p1", 0, 5),
    });

    // When strong is applied, "Hello" is bold
    state.apply(Action::ApplyMark {
        mark_type: MarkType::Strong,
        href: None,
    });
    assert_eq!(
        state.blocks()[0].marks,
        vec![Mark::new(MarkType::Strong, 0..5)]
    );

    // And applying it again unbolds it
    state.apply(Action::ApplyMark {
        mark_type: MarkType::Strong,
        href: None,
    });
    assert!(state.blocks()[0].marks.is_empty());
}

#[test]
fn test_toggling_inside_a_mark_removes_the_whole_mark() {
    // Given the whole text is strong
    let mut state = EditorState::new(vec![
        para("p1", "Hello world").with_marks(vec![Mark::new(MarkType::Strong, 0..11)]),
    ])
    .unwrap();

    // When strong is toggled on "world" only
    state.apply(Action::SetSelection {
        selection: LogicalSelection::new("p1", 6, 11),
    });
    state.apply(Action::ApplyMark {
        mark_type: MarkType::Strong,
        href: None,
    });

    // Then the covering mark is removed entirely, not split
    assert!(state.blocks()[0].marks.is_empty());
}

#[test]
fn test_sole_block_cannot_be_deleted() {
    let mut state = EditorState::new(vec![para("only", "x")]).unwrap();

    let patch = state.apply(Action::DeleteBlock {
        block_id: "only".into(),
    });

    assert!(!patch.applied);
    assert_eq!(ids(&state), vec!["only"]);
}

#[test]
fn test_duplicate_inserts_copy_after_original() {
    let mut state = EditorState::new(vec![para("A", "a"), para("B", "b"), para("C", "c")]).unwrap();

    let patch = state.apply(Action::DuplicateBlock {
        block_id: "B".into(),
    });

    let copy_id = patch.inserted[0].clone();
    assert_eq!(ids(&state), vec!["A", "B", copy_id.as_str(), "C"]);
    assert_ne!(copy_id, BlockId::from("B"));
    assert_eq!(state.blocks()[2].content, "b");
}

#[test]
fn test_delete_focused_block_moves_focus_to_previous() {
    let mut state = EditorState::new(vec![para("A", "a"), para("B", "b")]).unwrap();
    state.apply(Action::SetFocus {
        block_id: "B".into(),
    });

    state.apply(Action::DeleteBlock {
        block_id: "B".into(),
    });

    assert_eq!(ids(&state), vec!["A"]);
    assert_eq!(state.focused_block_id(), Some(&BlockId::from("A")));
}

#[test]
fn test_resizing_a_placeholder_image_keeps_it_unset() {
    // Given a paragraph turned into an image that has not been uploaded yet
    let mut state = EditorState::new(vec![para("p", "caption me")]).unwrap();
    state.apply(Action::ChangeBlockType {
        block_id: "p".into(),
        block_type: BlockType::Image,
    });

    // When a size is picked for it
    let patch = state.apply(Action::UpdateBlock {
        block_id: "p".into(),
        patch: BlockPatch::data(ImageDataPatch::size(ImageSize::Small)),
    });

    // Then nothing changes and no asset reference is invented
    assert!(!patch.applied);
    let json = serde_json::to_value(blocks_to_persisted(state.blocks())).unwrap();
    assert_eq!(json, serde_json::json!([{ "_type": "image", "_key": "p" }]));
}
