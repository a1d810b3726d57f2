//! Conversion between editor blocks and the stored JSON shape.
//!
//! Text blocks are stored as `{"_type": "block", "style", "listItem"?, "text", "marks"?}`
//! and image blocks as `{"_type": "image", "asset": {"_ref"}, "alt", ...}`.
//! Everything read back goes through model validation, so a malformed stored
//! document is an error rather than a half-loaded state.

use serde::{Deserialize, Serialize};

use crate::models::{
    Block, BlockId, BlockType, ImageAlignment, ImageData, ImageSize, Mark, MarkType, ModelError,
};

const BLOCK: &str = "block";
const IMAGE: &str = "image";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Unknown block _type '{kind}' on block {key}")]
    UnknownBlockType { key: String, kind: String },
    #[error("Unknown style '{style}' on block {key}")]
    UnknownStyle { key: String, style: String },
    #[error("Unknown listItem '{list_item}' on block {key}")]
    UnknownListItem { key: String, list_item: String },
    #[error("Unknown mark type '{mark_type}' on block {key}")]
    UnknownMarkType { key: String, mark_type: String },
    #[error("Block {key} is missing field '{field}'")]
    MissingField { key: String, field: &'static str },
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedBlock {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<PersistedMark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<ImageAlignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,
}

impl PersistedBlock {
    fn new(kind: &str, key: &BlockId) -> Self {
        Self {
            kind: kind.to_string(),
            key: key.to_string(),
            style: None,
            list_item: None,
            text: None,
            marks: Vec::new(),
            asset: None,
            alt: None,
            caption: None,
            alignment: None,
            size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedMark {
    #[serde(rename = "_type")]
    pub mark_type: String,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReference {
    #[serde(rename = "_ref")]
    pub reference: String,
}

/// Stored `(style, listItem)` pair of a text block type
fn style_of(block_type: BlockType) -> (&'static str, Option<&'static str>) {
    match block_type {
        BlockType::Paragraph | BlockType::Image => ("normal", None),
        BlockType::Heading2 => ("h2", None),
        BlockType::Heading3 => ("h3", None),
        BlockType::Heading4 => ("h4", None),
        BlockType::Blockquote => ("blockquote", None),
        BlockType::BulletList => ("normal", Some("bullet")),
        BlockType::NumberList => ("normal", Some("number")),
    }
}

fn text_block_type(stored: &PersistedBlock) -> Result<BlockType, PersistError> {
    if let Some(list_item) = &stored.list_item {
        return match list_item.as_str() {
            "bullet" => Ok(BlockType::BulletList),
            "number" => Ok(BlockType::NumberList),
            other => Err(PersistError::UnknownListItem {
                key: stored.key.clone(),
                list_item: other.to_string(),
            }),
        };
    }

    match stored.style.as_deref().unwrap_or("normal") {
        "normal" => Ok(BlockType::Paragraph),
        "h2" => Ok(BlockType::Heading2),
        "h3" => Ok(BlockType::Heading3),
        "h4" => Ok(BlockType::Heading4),
        "blockquote" => Ok(BlockType::Blockquote),
        other => Err(PersistError::UnknownStyle {
            key: stored.key.clone(),
            style: other.to_string(),
        }),
    }
}

fn marks_from_persisted(stored: &PersistedBlock) -> Result<Vec<Mark>, PersistError> {
    stored
        .marks
        .iter()
        .map(|mark| {
            let mark_type =
                MarkType::parse(&mark.mark_type).ok_or_else(|| PersistError::UnknownMarkType {
                    key: stored.key.clone(),
                    mark_type: mark.mark_type.clone(),
                })?;
            Ok(Mark {
                mark_type,
                start: mark.start,
                end: mark.end,
                href: mark.href.clone(),
            })
        })
        .collect()
}

pub fn block_to_persisted(block: &Block) -> PersistedBlock {
    if block.is_image() {
        let mut stored = PersistedBlock::new(IMAGE, &block.id);
        if let Some(data) = &block.data {
            stored.asset = Some(AssetReference {
                reference: data.asset_ref.clone(),
            });
            stored.alt = Some(data.alt_text.clone());
            stored.caption = (!data.caption.is_empty()).then(|| data.caption.clone());
            stored.alignment = Some(data.alignment);
            stored.size = Some(data.size);
        }
        return stored;
    }

    let (style, list_item) = style_of(block.block_type);
    let mut stored = PersistedBlock::new(BLOCK, &block.id);
    stored.style = Some(style.to_string());
    stored.list_item = list_item.map(str::to_string);
    stored.text = Some(block.content.clone());
    stored.marks = block
        .marks
        .iter()
        .map(|mark| PersistedMark {
            mark_type: mark.mark_type.as_str().to_string(),
            start: mark.start,
            end: mark.end,
            href: mark.href.clone(),
        })
        .collect();
    stored
}

/// Validate and convert one stored element
pub fn block_from_persisted(stored: PersistedBlock) -> Result<Block, PersistError> {
    let id = BlockId::new(stored.key.clone());

    let block = match stored.kind.as_str() {
        BLOCK => {
            let block_type = text_block_type(&stored)?;
            let Some(text) = stored.text.clone() else {
                return Err(PersistError::MissingField {
                    key: stored.key,
                    field: "text",
                });
            };
            let marks = marks_from_persisted(&stored)?;
            let mut block = Block::text(id, block_type, text).with_marks(marks);
            // Left in place for validation to reject
            block.data = stored.asset.map(|asset| ImageData::new(asset.reference, ""));
            block
        }
        IMAGE => {
            // Marks or text on an image are rejected by validation
            let marks = marks_from_persisted(&stored)?;
            let content = stored.text.clone().unwrap_or_default();
            let has_image_fields = stored.alt.is_some()
                || stored.caption.is_some()
                || stored.alignment.is_some()
                || stored.size.is_some();
            let data = match stored.asset {
                Some(asset) => Some(ImageData {
                    asset_ref: asset.reference,
                    alt_text: stored.alt.unwrap_or_default(),
                    caption: stored.caption.unwrap_or_default(),
                    alignment: stored.alignment.unwrap_or_default(),
                    size: stored.size.unwrap_or_default(),
                }),
                None if has_image_fields => {
                    return Err(PersistError::MissingField {
                        key: stored.key,
                        field: "asset",
                    });
                }
                // Placeholder image still waiting for an upload
                None => None,
            };
            Block {
                id,
                block_type: BlockType::Image,
                content,
                marks,
                data,
            }
        }
        other => {
            return Err(PersistError::UnknownBlockType {
                key: stored.key.clone(),
                kind: other.to_string(),
            });
        }
    };

    Ok(block.validated()?)
}

pub fn blocks_to_persisted(blocks: &[Block]) -> Vec<PersistedBlock> {
    blocks.iter().map(block_to_persisted).collect()
}

/// Convert a stored document, preserving order. Fails on the first invalid element.
pub fn blocks_from_persisted(stored: Vec<PersistedBlock>) -> Result<Vec<Block>, PersistError> {
    stored.into_iter().map(block_from_persisted).collect()
}
