use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Mark, MarkType, ModelError};

/// Stable identifier of a block within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identifier for newly created blocks
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The closed set of block kinds the editor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Paragraph,
    Heading2,
    Heading3,
    Heading4,
    Blockquote,
    BulletList,
    NumberList,
    Image,
}

impl BlockType {
    pub const ALL: [BlockType; 8] = [
        BlockType::Paragraph,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::Heading4,
        BlockType::Blockquote,
        BlockType::BulletList,
        BlockType::NumberList,
        BlockType::Image,
    ];

    pub fn is_text(&self) -> bool {
        !matches!(self, BlockType::Image)
    }

    /// Heading level for heading blocks (2-4)
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            BlockType::Heading2 => Some(2),
            BlockType::Heading3 => Some(3),
            BlockType::Heading4 => Some(4),
            _ => None,
        }
    }

    /// Human readable label for block-type menus
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "Paragraph",
            BlockType::Heading2 => "Heading 2",
            BlockType::Heading3 => "Heading 3",
            BlockType::Heading4 => "Heading 4",
            BlockType::Blockquote => "Quote",
            BlockType::BulletList => "Bullet list",
            BlockType::NumberList => "Numbered list",
            BlockType::Image => "Image",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAlignment {
    Left,
    #[default]
    Center,
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    Medium,
    #[default]
    Large,
}

impl ImageSize {
    /// Rendered width as a percentage of the content column
    pub fn width_percent(&self) -> u8 {
        match self {
            ImageSize::Small => 40,
            ImageSize::Medium => 70,
            ImageSize::Large => 100,
        }
    }
}

/// Block-local metadata carried by image blocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ImageData {
    pub asset_ref: String,
    pub alt_text: String,
    pub caption: String,
    pub alignment: ImageAlignment,
    pub size: ImageSize,
}

impl ImageData {
    pub fn new(asset_ref: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self {
            asset_ref: asset_ref.into(),
            alt_text: alt_text.into(),
            ..Self::default()
        }
    }
}

/// One structural unit of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub block_type: BlockType,
    pub content: String,
    pub marks: Vec<Mark>,
    pub data: Option<ImageData>,
}

impl Block {
    /// An empty block of the given type with a fresh id
    pub fn empty(block_type: BlockType) -> Self {
        Self {
            id: BlockId::generate(),
            block_type,
            content: String::new(),
            marks: Vec::new(),
            data: None,
        }
    }

    /// A text block with no formatting
    pub fn text(id: impl Into<BlockId>, block_type: BlockType, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block_type,
            content: content.into(),
            marks: Vec::new(),
            data: None,
        }
    }

    pub fn image(id: impl Into<BlockId>, data: ImageData) -> Self {
        Self {
            id: id.into(),
            block_type: BlockType::Image,
            content: String::new(),
            marks: Vec::new(),
            data: Some(data),
        }
    }

    /// Builder-style helper mostly used when assembling fixtures
    pub fn with_marks(mut self, marks: Vec<Mark>) -> Self {
        self.marks = marks;
        self
    }

    pub fn is_image(&self) -> bool {
        self.block_type == BlockType::Image
    }

    /// Content length in chars, the unit all mark offsets use
    pub fn len(&self) -> usize {
        char_len(&self.content)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Checks the block invariants, returning the block unchanged when they hold
    pub fn validated(self) -> Result<Self, ModelError> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let invalid = |reason: String| ModelError::InvalidBlock {
            id: self.id.clone(),
            reason,
        };

        if self.is_image() {
            if !self.marks.is_empty() {
                return Err(invalid("image blocks cannot carry marks".to_string()));
            }
            if !self.content.is_empty() {
                return Err(invalid("image blocks cannot carry text".to_string()));
            }
            return Ok(());
        }

        if self.data.is_some() {
            return Err(invalid(format!(
                "{} block cannot carry image data",
                self.block_type.label()
            )));
        }

        let len = self.len();
        for mark in &self.marks {
            if mark.start >= mark.end {
                return Err(invalid(format!(
                    "{} mark has empty range {}..{}",
                    mark.mark_type, mark.start, mark.end
                )));
            }
            if mark.end > len {
                return Err(invalid(format!(
                    "{} mark ends at {} but content is {} chars long",
                    mark.mark_type, mark.end, len
                )));
            }
            if mark.href.is_some() && mark.mark_type != MarkType::Link {
                return Err(invalid(format!("{} mark cannot carry href", mark.mark_type)));
            }
        }

        Ok(())
    }
}

/// Length of `text` in chars
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
