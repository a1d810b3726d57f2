use crate::models::BlockId;

/// Result of applying an action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    /// False when the action was declined and the state left untouched
    pub applied: bool,
    /// Blocks whose content, marks, data or type changed
    pub changed: Vec<BlockId>,
    pub inserted: Vec<BlockId>,
    pub removed: Vec<BlockId>,
    /// The persisted document changed (content, marks, data, type or order).
    /// Save collaborators key off this.
    pub content_changed: bool,
    pub version: u64,
}

impl Patch {
    pub(crate) fn ignored(version: u64) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }
}
