//! Interaction controller: turns raw keyboard and selection-change events
//! into reducer actions.
//!
//! Selection-change events arrive continuously while a drag is in progress.
//! Each one re-reads the platform selection at event time, so the latest
//! event always wins and nothing is queued.

use std::sync::LazyLock;

use regex::Regex;

use crate::editing::marks::has_mark;
use crate::editing::{Action, Direction, EditorState, Patch, SelectionMapper, SelectionSource};
use crate::models::MarkType;

static URL_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-zA-Z][a-zA-Z0-9+.-]*://|mailto:|tel:)").expect("valid scheme regex")
});

/// Which modifier acts as the primary shortcut modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Command is primary
    Mac,
    /// Control is primary
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    ArrowUp,
    ArrowDown,
    Backspace,
    Named(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Parse combos like `mod+shift+ArrowUp` or `ctrl+b`.
    ///
    /// `mod` means the platform's primary modifier. Returns `None` for an
    /// empty combo or an unknown modifier.
    pub fn parse(combo: &str, platform: Platform) -> Option<Self> {
        let mut parts: Vec<&str> = combo.split('+').map(str::trim).collect();
        let key_name = parts.pop().filter(|k| !k.is_empty())?;

        let mut modifiers = Modifiers::default();
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "mod" | "primary" => match platform {
                    Platform::Mac => modifiers.meta = true,
                    Platform::Other => modifiers.ctrl = true,
                },
                "ctrl" | "control" => modifiers.ctrl = true,
                "cmd" | "meta" | "super" => modifiers.meta = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" => modifiers.alt = true,
                _ => return None,
            }
        }

        let key = match key_name {
            "ArrowUp" | "up" => Key::ArrowUp,
            "ArrowDown" | "down" => Key::ArrowDown,
            "Backspace" | "backspace" => Key::Backspace,
            name => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Named(name.to_string()),
                }
            }
        };

        Some(Self { key, modifiers })
    }

    fn primary(&self, platform: Platform) -> bool {
        match platform {
            Platform::Mac => self.modifiers.meta,
            Platform::Other => self.modifiers.ctrl,
        }
    }
}

/// Editor shortcuts recognised by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    ToggleMark(MarkType),
    ToggleLink,
    DuplicateBlock,
    MoveBlock(Direction),
    DeleteBlock,
    ToggleOutline,
}

/// Map a key press onto a shortcut, if it is one
pub fn resolve_shortcut(key: &KeyPress, platform: Platform) -> Option<Shortcut> {
    if !key.primary(platform) || key.modifiers.alt {
        return None;
    }
    let shift = key.modifiers.shift;

    match &key.key {
        Key::Char(c) => match (c.to_ascii_lowercase(), shift) {
            ('b', false) => Some(Shortcut::ToggleMark(MarkType::Strong)),
            ('i', false) => Some(Shortcut::ToggleMark(MarkType::Em)),
            ('u', false) => Some(Shortcut::ToggleMark(MarkType::Underline)),
            ('k', false) => Some(Shortcut::ToggleLink),
            ('d', false) => Some(Shortcut::DuplicateBlock),
            ('o', true) => Some(Shortcut::ToggleOutline),
            _ => None,
        },
        Key::ArrowUp if shift => Some(Shortcut::MoveBlock(Direction::Up)),
        Key::ArrowDown if shift => Some(Shortcut::MoveBlock(Direction::Down)),
        Key::Backspace if !shift => Some(Shortcut::DeleteBlock),
        _ => None,
    }
}

/// Asks the user for a link target
pub trait LinkPrompt {
    fn request_url(&mut self) -> Option<String>;
}

impl<F> LinkPrompt for F
where
    F: FnMut() -> Option<String>,
{
    fn request_url(&mut self) -> Option<String> {
        self()
    }
}

/// Prefix `https://` when `url` carries no scheme. Blank input yields `None`.
pub fn normalize_link_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if URL_SCHEME.is_match(url) {
        Some(url.to_string())
    } else {
        Some(format!("https://{url}"))
    }
}

/// What the controller did with an event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// The shortcut the key resolved to; hosts suppress the platform's
    /// default handling whenever this is set
    pub shortcut: Option<Shortcut>,
    pub patches: Vec<Patch>,
}

impl EventOutcome {
    pub fn is_shortcut(&self) -> bool {
        self.shortcut.is_some()
    }

    pub fn applied(&self) -> bool {
        self.patches.iter().any(|p| p.applied)
    }

    pub fn content_changed(&self) -> bool {
        self.patches.iter().any(|p| p.content_changed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionController {
    platform: Platform,
    mapper: SelectionMapper,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(Platform::current(), SelectionMapper::default())
    }
}

impl InteractionController {
    pub fn new(platform: Platform, mapper: SelectionMapper) -> Self {
        Self { platform, mapper }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Handle a key press. Shortcuts whose precondition fails are declined
    /// silently: the outcome names the shortcut but carries no applied patch.
    pub fn handle_key(
        &self,
        state: &mut EditorState,
        key: &KeyPress,
        prompt: &mut impl LinkPrompt,
    ) -> EventOutcome {
        let Some(shortcut) = resolve_shortcut(key, self.platform) else {
            return EventOutcome::default();
        };

        let patches = if state.is_modal_open() {
            log::debug!("{shortcut:?} declined: image upload modal is open");
            Vec::new()
        } else {
            run_shortcut(state, shortcut, prompt)
        };

        EventOutcome {
            shortcut: Some(shortcut),
            patches,
        }
    }

    /// Re-read the platform selection and sync selection and toolbar state
    pub fn handle_selection_change(
        &self,
        state: &mut EditorState,
        source: &impl SelectionSource,
    ) -> Vec<Patch> {
        if state.is_modal_open() {
            return Vec::new();
        }

        let mut patches = Vec::new();
        match self.mapper.read(source) {
            Some(mapped) => {
                if state.selection() != Some(&mapped.selection) {
                    patches.push(state.apply(Action::SetSelection {
                        selection: Some(mapped.selection),
                    }));
                }
                let action = match mapped.anchor {
                    Some(anchor) => Action::ShowInlineToolbar { anchor },
                    None => Action::HideInlineToolbar,
                };
                patches.push(state.apply(action));
            }
            None => {
                if state.selection().is_some() {
                    patches.push(state.apply(Action::SetSelection { selection: None }));
                }
                if state.inline_toolbar().visible {
                    patches.push(state.apply(Action::HideInlineToolbar));
                }
            }
        }
        patches
    }
}

fn run_shortcut(
    state: &mut EditorState,
    shortcut: Shortcut,
    prompt: &mut impl LinkPrompt,
) -> Vec<Patch> {
    match shortcut {
        Shortcut::ToggleMark(mark_type) => {
            if state.selection().is_none() {
                return Vec::new();
            }
            vec![state.apply(Action::ApplyMark {
                mark_type,
                href: None,
            })]
        }
        Shortcut::ToggleLink => toggle_link(state, prompt),
        Shortcut::DuplicateBlock => {
            let Some(block_id) = state.focused_block_id().cloned() else {
                return Vec::new();
            };
            let duplicated = state.apply(Action::DuplicateBlock { block_id });
            let mut patches = Vec::new();
            if let Some(copy_id) = duplicated.inserted.first().cloned() {
                patches.push(duplicated);
                patches.push(state.apply(Action::SetFocus { block_id: copy_id }));
            }
            patches
        }
        Shortcut::MoveBlock(direction) => match state.focused_block_id().cloned() {
            Some(block_id) => vec![state.apply(Action::MoveBlock {
                block_id,
                direction,
            })],
            None => Vec::new(),
        },
        Shortcut::DeleteBlock => match state.focused_block_id().cloned() {
            Some(block_id) if state.blocks().len() > 1 => {
                vec![state.apply(Action::DeleteBlock { block_id })]
            }
            _ => Vec::new(),
        },
        Shortcut::ToggleOutline => vec![state.apply(Action::ToggleOutline)],
    }
}

/// Remove the covering link, or prompt for a target and add one
fn toggle_link(state: &mut EditorState, prompt: &mut impl LinkPrompt) -> Vec<Patch> {
    let Some(selection) = state.selection() else {
        return Vec::new();
    };
    let Some(block) = state.block(&selection.block_id) else {
        return Vec::new();
    };
    if block.is_image() {
        return Vec::new();
    }

    if has_mark(block, MarkType::Link, &selection.range()) {
        return vec![state.apply(Action::ApplyMark {
            mark_type: MarkType::Link,
            href: None,
        })];
    }

    let Some(href) = prompt.request_url().as_deref().and_then(normalize_link_url) else {
        log::debug!("link prompt cancelled");
        return Vec::new();
    };
    vec![state.apply(Action::ApplyMark {
        mark_type: MarkType::Link,
        href: Some(href),
    })]
}
