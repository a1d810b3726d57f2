//! Line-based editor scripts.
//!
//! One command per line; blank lines and `#` comments are skipped.
//!
//! ```text
//! select <block> <anchor> <focus>   drag a selection inside one block
//! deselect                          collapse the selection
//! key <combo>                       press a key, e.g. `mod+b`, `mod+shift+ArrowUp`
//! link <url>                        answer the next link prompt
//! focus <block> | blur
//! type <block> <text...>            replace a block's text
//! retype <block> <type>             paragraph, h2, h3, h4, quote, bullet, number, image
//! insert <type> [after <block>]
//! move <block> up|down | delete <block> | duplicate <block>
//! align <block> left|center|full | size <block> small|medium|large
//! modal [block] | close             open or close the image upload dialog
//! upload <file> [alt...]            upload through the open dialog
//! outline                           toggle the outline panel
//! print                             print the document grouping and outline
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use blockmark_engine::editing::{
    Action, BlockActions, BlockPatch, ContentGroup, Direction, EditorEvent, EditorSession,
    ImageOptions, KeyPress, UploadFile, block_actions,
};
use blockmark_engine::models::{Block, BlockId, BlockType, ImageAlignment, ImageSize};

use crate::host::{DirectoryStore, ScriptHost, mime_type_of};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select {
        block_id: BlockId,
        anchor: usize,
        focus: usize,
    },
    Deselect,
    Key(String),
    Link(String),
    Focus(BlockId),
    Blur,
    Type { block_id: BlockId, text: String },
    Retype { block_id: BlockId, block_type: BlockType },
    Insert { block_type: BlockType, after: Option<BlockId> },
    Move { block_id: BlockId, direction: Direction },
    Delete(BlockId),
    Duplicate(BlockId),
    Align { block_id: BlockId, alignment: ImageAlignment },
    Size { block_id: BlockId, size: ImageSize },
    Modal(Option<BlockId>),
    Close,
    Upload { path: PathBuf, alt_text: String },
    Outline,
    Print,
}

fn parse_block_type(name: &str) -> Result<BlockType> {
    Ok(match name {
        "paragraph" | "p" => BlockType::Paragraph,
        "h2" => BlockType::Heading2,
        "h3" => BlockType::Heading3,
        "h4" => BlockType::Heading4,
        "quote" | "blockquote" => BlockType::Blockquote,
        "bullet" => BlockType::BulletList,
        "number" => BlockType::NumberList,
        "image" => BlockType::Image,
        other => bail!("unknown block type '{other}'"),
    })
}

fn parse_offset(value: Option<&str>) -> Result<usize> {
    let value = value.ok_or_else(|| anyhow!("missing offset"))?;
    value
        .parse()
        .with_context(|| format!("invalid offset '{value}'"))
}

fn block_arg(value: Option<&str>) -> Result<BlockId> {
    value
        .map(BlockId::from)
        .ok_or_else(|| anyhow!("missing block id"))
}

/// The remainder of `line` after its first `skip` words, unmodified
fn rest_of(line: &str, skip: usize) -> String {
    let mut rest = line.trim_start();
    for _ in 0..skip {
        rest = rest
            .split_once(char::is_whitespace)
            .map(|(_, tail)| tail.trim_start())
            .unwrap_or("");
    }
    rest.to_string()
}

pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };

    let command = match name {
        "select" => Command::Select {
            block_id: block_arg(words.next())?,
            anchor: parse_offset(words.next())?,
            focus: parse_offset(words.next())?,
        },
        "deselect" => Command::Deselect,
        "key" => Command::Key(
            words
                .next()
                .ok_or_else(|| anyhow!("missing key combo"))?
                .to_string(),
        ),
        "link" => Command::Link(rest_of(line, 1)),
        "focus" => Command::Focus(block_arg(words.next())?),
        "blur" => Command::Blur,
        "type" => Command::Type {
            block_id: block_arg(words.next())?,
            text: rest_of(line, 2),
        },
        "retype" => Command::Retype {
            block_id: block_arg(words.next())?,
            block_type: parse_block_type(words.next().unwrap_or_default())?,
        },
        "insert" => {
            let block_type = parse_block_type(words.next().unwrap_or_default())?;
            let after = match words.next() {
                Some("after") => Some(block_arg(words.next())?),
                Some(other) => bail!("expected 'after', found '{other}'"),
                None => None,
            };
            Command::Insert { block_type, after }
        }
        "move" => Command::Move {
            block_id: block_arg(words.next())?,
            direction: match words.next() {
                Some("up") => Direction::Up,
                Some("down") => Direction::Down,
                _ => bail!("move needs 'up' or 'down'"),
            },
        },
        "delete" => Command::Delete(block_arg(words.next())?),
        "duplicate" => Command::Duplicate(block_arg(words.next())?),
        "align" => Command::Align {
            block_id: block_arg(words.next())?,
            alignment: match words.next() {
                Some("left") => ImageAlignment::Left,
                Some("center") => ImageAlignment::Center,
                Some("full") => ImageAlignment::Full,
                _ => bail!("align needs 'left', 'center' or 'full'"),
            },
        },
        "size" => Command::Size {
            block_id: block_arg(words.next())?,
            size: match words.next() {
                Some("small") => ImageSize::Small,
                Some("medium") => ImageSize::Medium,
                Some("large") => ImageSize::Large,
                _ => bail!("size needs 'small', 'medium' or 'large'"),
            },
        },
        "modal" => Command::Modal(words.next().map(BlockId::from)),
        "close" => Command::Close,
        "upload" => Command::Upload {
            path: PathBuf::from(words.next().ok_or_else(|| anyhow!("missing file path"))?),
            alt_text: rest_of(line, 2),
        },
        "outline" => Command::Outline,
        "print" => Command::Print,
        other => bail!("unknown command '{other}'"),
    };

    Ok(Some(command))
}

pub fn parse_script(script: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (number, line) in script.lines().enumerate() {
        if let Some(command) =
            parse_line(line).with_context(|| format!("line {}: {line}", number + 1))?
        {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// Replays commands against one session, collecting `print` output
pub struct ScriptRunner {
    session: EditorSession,
    host: ScriptHost,
    store: DirectoryStore,
    base_dir: PathBuf,
    output: String,
}

impl ScriptRunner {
    /// `base_dir` resolves relative upload paths; uploads land in `assets/` under it
    pub fn new(mut session: EditorSession, base_dir: &Path) -> Self {
        let mut host = ScriptHost::default();
        host.sync(session.state());
        session.mount();
        Self {
            session,
            host,
            store: DirectoryStore::new(base_dir.join("assets")),
            base_dir: base_dir.to_path_buf(),
            output: String::new(),
        }
    }

    pub fn finish(mut self) -> (EditorSession, String) {
        self.session.unmount();
        (self.session, self.output)
    }

    pub fn run_all(&mut self, commands: Vec<Command>) -> Result<()> {
        for command in commands {
            let description = format!("{command:?}");
            self.run(command)
                .with_context(|| format!("while running {description}"))?;
        }
        Ok(())
    }

    pub fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Select {
                block_id,
                anchor,
                focus,
            } => {
                self.host.select(block_id, anchor, focus);
                self.session
                    .handle(EditorEvent::SelectionChanged, &mut self.host);
            }
            Command::Deselect => {
                self.host.clear_selection();
                self.session
                    .handle(EditorEvent::SelectionChanged, &mut self.host);
            }
            Command::Key(combo) => {
                let platform = self.session.controller().platform();
                let key = KeyPress::parse(&combo, platform)
                    .ok_or_else(|| anyhow!("invalid key combo '{combo}'"))?;
                let outcome = self.session.handle(EditorEvent::Key(key), &mut self.host);
                if !outcome.is_shortcut() {
                    log::warn!("{combo} is not an editor shortcut");
                }
            }
            Command::Link(url) => self.host.answer_link(url),
            Command::Focus(block_id) => self.dispatch(Action::SetFocus { block_id }),
            Command::Blur => self.dispatch(Action::ClearFocus),
            Command::Type { block_id, text } => self.dispatch(Action::UpdateBlock {
                block_id,
                patch: BlockPatch::content(text),
            }),
            Command::Retype {
                block_id,
                block_type,
            } => {
                let action = self
                    .actions_for(&block_id)?
                    .retype_action(block_type)
                    .ok_or_else(|| anyhow!("{block_id} is already a {}", block_type.label()))?;
                self.dispatch(action);
            }
            Command::Insert { block_type, after } => {
                self.dispatch(Action::InsertBlock { after, block_type })
            }
            Command::Move {
                block_id,
                direction,
            } => {
                let action = self
                    .actions_for(&block_id)?
                    .move_action(direction)
                    .ok_or_else(|| anyhow!("{block_id} cannot move {direction:?}"))?;
                self.dispatch(action);
            }
            Command::Delete(block_id) => {
                let action = self
                    .actions_for(&block_id)?
                    .delete_action()
                    .ok_or_else(|| anyhow!("{block_id} is the only block"))?;
                self.dispatch(action);
            }
            Command::Duplicate(block_id) => self.dispatch(Action::DuplicateBlock { block_id }),
            Command::Align {
                block_id,
                alignment,
            } => {
                let options = self.image_options_for(&block_id)?;
                self.dispatch(options.set_alignment(alignment));
            }
            Command::Size { block_id, size } => {
                let options = self.image_options_for(&block_id)?;
                self.dispatch(options.set_size(size));
            }
            Command::Modal(target_block_id) => {
                self.dispatch(Action::ShowImageUploadModal { target_block_id })
            }
            Command::Close => self.dispatch(Action::HideImageUploadModal),
            Command::Upload { path, alt_text } => self.upload(&path, &alt_text)?,
            Command::Outline => self.dispatch(Action::ToggleOutline),
            Command::Print => self.print(),
        }

        self.host.sync(self.session.state());
        Ok(())
    }

    fn dispatch(&mut self, action: Action) {
        let description = format!("{action:?}");
        let patch = self.session.dispatch(action);
        if !patch.applied {
            log::warn!("ignored: {description}");
        }
    }

    fn actions_for(&self, block_id: &BlockId) -> Result<BlockActions> {
        block_actions(self.session.state(), block_id)
            .ok_or_else(|| anyhow!("unknown block {block_id}"))
    }

    fn image_options_for(&self, block_id: &BlockId) -> Result<ImageOptions> {
        self.actions_for(block_id)?
            .image_options
            .ok_or_else(|| anyhow!("{block_id} is not an uploaded image"))
    }

    fn upload(&mut self, path: &Path, alt_text: &str) -> Result<()> {
        if !self.session.state().is_modal_open() {
            bail!("open the upload dialog with 'modal' first");
        }
        let path = if path.is_relative() {
            self.base_dir.join(path)
        } else {
            path.to_path_buf()
        };
        let file = read_upload(&path)?;
        self.session.upload_image(&file, alt_text, &mut self.store)?;
        Ok(())
    }

    fn print(&mut self) {
        let snapshot = self.session.state().snapshot();
        let mut out = String::new();
        for group in &snapshot.groups {
            match group {
                ContentGroup::SingleBlock(block) => {
                    let _ = writeln!(out, "{}", describe(block));
                }
                ContentGroup::BulletListGroup { items } => {
                    for block in items {
                        let _ = writeln!(out, "  - {}", block.content);
                    }
                }
                ContentGroup::NumberedListGroup { items } => {
                    for (i, block) in items.iter().enumerate() {
                        let _ = writeln!(out, "  {}. {}", i + 1, block.content);
                    }
                }
            }
        }
        if self.session.state().outline_visible() {
            let _ = writeln!(out, "Outline:");
            for entry in &snapshot.outline {
                let indent = "  ".repeat(usize::from(entry.level.saturating_sub(2)));
                let _ = writeln!(out, "  {indent}{}", entry.text);
            }
        }
        self.output.push_str(&out);
    }
}

fn describe(block: &Block) -> String {
    match (&block.block_type, &block.data) {
        (BlockType::Image, Some(data)) => format!(
            "[image {} \"{}\" {:?} {}%]",
            data.asset_ref,
            data.alt_text,
            data.alignment,
            data.size.width_percent()
        ),
        (BlockType::Image, None) => "[image placeholder]".to_string(),
        (block_type, _) => match block_type.heading_level() {
            Some(level) => format!("{} {}", "#".repeat(usize::from(level)), block.content),
            None if *block_type == BlockType::Blockquote => format!("> {}", block.content),
            None => block.content.clone(),
        },
    }
}

/// Read an upload straight from disk
pub fn read_upload(path: &Path) -> Result<UploadFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());
    Ok(UploadFile {
        name,
        mime_type: mime_type_of(path),
        bytes,
    })
}
