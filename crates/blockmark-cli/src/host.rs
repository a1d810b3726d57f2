use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use blockmark_engine::editing::{
    AssetUploader, EditorState, LinkPrompt, NativePoint, NativeSelection, NodeId, Rect,
    SelectionSource, StoredAsset, TextRun, UploadFile,
};
use blockmark_engine::models::BlockId;

/// Height of one rendered line in the pretend layout
const LINE_HEIGHT: f64 = 20.0;
/// Width of one rendered char in the pretend layout
const CHAR_WIDTH: f64 = 8.0;

/// Headless stand-in for a rendered editing surface.
///
/// Every block renders as a single text node on its own line, so node ids
/// are block indices and the selection bounds come from a fixed-width layout.
#[derive(Debug, Default)]
pub struct ScriptHost {
    blocks: Vec<(BlockId, usize)>,
    selection: Option<(BlockId, usize, usize)>,
    link_answers: VecDeque<String>,
}

impl ScriptHost {
    /// Re-read the rendered blocks after the document changed
    pub fn sync(&mut self, state: &EditorState) {
        self.blocks = state
            .blocks()
            .iter()
            .map(|block| (block.id.clone(), block.len()))
            .collect();
    }

    pub fn select(&mut self, block_id: BlockId, anchor: usize, focus: usize) {
        self.selection = Some((block_id, anchor, focus));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Queue the answer to the next link prompt
    pub fn answer_link(&mut self, url: impl Into<String>) {
        self.link_answers.push_back(url.into());
    }

    fn node_of(&self, block_id: &BlockId) -> Option<NodeId> {
        self.blocks
            .iter()
            .position(|(id, _)| id == block_id)
            .map(|index| NodeId(index as u64))
    }
}

impl SelectionSource for ScriptHost {
    fn current_selection(&self) -> Option<NativeSelection> {
        let (block_id, anchor, focus) = self.selection.as_ref()?;
        let node = self.node_of(block_id)?;
        let (start, end) = ((*anchor).min(*focus), (*anchor).max(*focus));

        Some(NativeSelection {
            anchor: NativePoint {
                node,
                offset: *anchor,
            },
            focus: NativePoint {
                node,
                offset: *focus,
            },
            bounds: Some(Rect {
                x: start as f64 * CHAR_WIDTH,
                y: node.0 as f64 * LINE_HEIGHT,
                width: (end - start) as f64 * CHAR_WIDTH,
                height: LINE_HEIGHT,
            }),
        })
    }

    fn container_of(&self, node: NodeId) -> Option<BlockId> {
        self.blocks
            .get(node.0 as usize)
            .map(|(block_id, _)| block_id.clone())
    }

    fn text_runs(&self, block_id: &BlockId) -> Vec<TextRun> {
        match self.node_of(block_id) {
            Some(node) => vec![TextRun {
                node,
                len: self.blocks[node.0 as usize].1,
            }],
            None => Vec::new(),
        }
    }
}

impl LinkPrompt for ScriptHost {
    fn request_url(&mut self) -> Option<String> {
        self.link_answers.pop_front()
    }
}

/// Asset store writing uploads into a directory next to the document
#[derive(Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetUploader for DirectoryStore {
    fn upload(&mut self, file: &UploadFile) -> Result<StoredAsset, String> {
        fs::create_dir_all(&self.root).map_err(|e| e.to_string())?;
        let target = self.root.join(&file.name);
        fs::write(&target, &file.bytes).map_err(|e| e.to_string())?;
        log::info!("Stored asset {}", target.display());
        Ok(StoredAsset {
            asset_ref: format!("file:{}", target.display()),
        })
    }
}

/// MIME type from a file extension, for the handful of formats we know
pub fn mime_type_of(path: &Path) -> String {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
    .to_string()
}
