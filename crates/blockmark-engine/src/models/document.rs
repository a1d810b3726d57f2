use std::collections::HashSet;

use crate::models::{Block, BlockId, BlockType, ModelError};

/// An ordered, never-empty sequence of blocks with unique ids.
///
/// Order is significant: blocks render top to bottom. The editor state keeps
/// its blocks in a `Document` so the non-empty and unique-id invariants are
/// checked once at load time and preserved by every reducer action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Build a document from already-constructed blocks.
    ///
    /// Every block is validated and ids must be unique. An empty list becomes
    /// a document holding a single empty paragraph.
    pub fn new(blocks: Vec<Block>) -> Result<Self, ModelError> {
        if blocks.is_empty() {
            return Ok(Self::default());
        }

        let mut seen = HashSet::with_capacity(blocks.len());
        for block in &blocks {
            block.validate()?;
            if !seen.insert(&block.id) {
                return Err(ModelError::DuplicateBlockId(block.id.clone()));
            }
        }

        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| &b.id == id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.index_of(id).is_some()
    }

    pub(crate) fn insert(&mut self, index: usize, block: Block) {
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, block);
    }

    /// Remove a block, refusing to remove the last remaining one
    pub(crate) fn remove(&mut self, index: usize) -> Option<Block> {
        if self.blocks.len() <= 1 || index >= self.blocks.len() {
            return None;
        }
        Some(self.blocks.remove(index))
    }

    /// Swap the block at `index` with its neighbour at `other`
    pub(crate) fn swap(&mut self, index: usize, other: usize) {
        self.blocks.swap(index, other);
    }

    /// Replace the block at `index` wholesale, keeping the document non-empty
    pub(crate) fn replace(&mut self, index: usize, block: Block) -> Option<Block> {
        let slot = self.blocks.get_mut(index)?;
        Some(std::mem::replace(slot, block))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self {
            blocks: vec![Block::empty(BlockType::Paragraph)],
        }
    }
}
