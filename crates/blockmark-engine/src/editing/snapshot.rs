use crate::editing::EditorState;
use crate::models::{Block, BlockId, BlockType};

/// Content grouping for rendering.
///
/// Consecutive list blocks are gathered so a frontend can emit one
/// `<ul>`/`<ol>` per run instead of one per item.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentGroup {
    /// Any non-list block
    SingleBlock(Block),
    /// Consecutive bullet list items
    BulletListGroup { items: Vec<Block> },
    /// Consecutive numbered list items
    NumberedListGroup { items: Vec<Block> },
}

impl ContentGroup {
    pub fn blocks(&self) -> &[Block] {
        match self {
            ContentGroup::SingleBlock(block) => std::slice::from_ref(block),
            ContentGroup::BulletListGroup { items } | ContentGroup::NumberedListGroup { items } => {
                items
            }
        }
    }
}

/// A heading as listed in the document outline panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub block_id: BlockId,
    /// 2, 3 or 4
    pub level: u8,
    pub text: String,
}

/// Immutable view of an editor state for rendering.
///
/// Carries the state version so a frontend can skip re-rendering when
/// nothing was applied since its last snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub version: u64,
    pub groups: Vec<ContentGroup>,
    pub outline: Vec<OutlineEntry>,
}

impl EditorState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: self.version(),
            groups: group_blocks(self.blocks()),
            outline: outline(self.blocks()),
        }
    }
}

fn group_blocks(blocks: &[Block]) -> Vec<ContentGroup> {
    let mut groups: Vec<ContentGroup> = Vec::new();

    for block in blocks {
        let extended = match (block.block_type, groups.last_mut()) {
            (BlockType::BulletList, Some(ContentGroup::BulletListGroup { items }))
            | (BlockType::NumberList, Some(ContentGroup::NumberedListGroup { items })) => {
                items.push(block.clone());
                true
            }
            _ => false,
        };
        if extended {
            continue;
        }

        groups.push(match block.block_type {
            BlockType::BulletList => ContentGroup::BulletListGroup {
                items: vec![block.clone()],
            },
            BlockType::NumberList => ContentGroup::NumberedListGroup {
                items: vec![block.clone()],
            },
            _ => ContentGroup::SingleBlock(block.clone()),
        });
    }

    groups
}

fn outline(blocks: &[Block]) -> Vec<OutlineEntry> {
    blocks
        .iter()
        .filter_map(|block| {
            block.block_type.heading_level().map(|level| OutlineEntry {
                block_id: block.id.clone(),
                level,
                text: block.content.clone(),
            })
        })
        .collect()
}
