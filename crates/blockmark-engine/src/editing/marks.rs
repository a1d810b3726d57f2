//! Mark engine: coverage queries and the toggle policy for inline formatting.
//!
//! A mark "covers" a range when its own span fully contains it; partial
//! overlap never counts. Toggling off removes the whole covering mark, even
//! when the selection only touches part of it. Toggling on adds a mark with
//! exactly the selected span and leaves any overlapping marks of the same
//! type alone (same-type marks may overlap and are never merged).

use std::ops::Range;

use crate::models::{Block, Mark, MarkType};

/// The first mark of `mark_type` whose span contains `range`
pub fn covering_mark<'a>(
    block: &'a Block,
    mark_type: MarkType,
    range: &Range<usize>,
) -> Option<&'a Mark> {
    block
        .marks
        .iter()
        .find(|m| m.mark_type == mark_type && m.covers(range))
}

pub fn has_mark(block: &Block, mark_type: MarkType, range: &Range<usize>) -> bool {
    covering_mark(block, mark_type, range).is_some()
}

/// Mark types that cover `range`, in `MarkType::ALL` order
pub fn active_marks(block: &Block, range: &Range<usize>) -> Vec<MarkType> {
    MarkType::ALL
        .into_iter()
        .filter(|t| has_mark(block, *t, range))
        .collect()
}

/// Toggle `mark_type` over `range`, returning the updated block.
///
/// `href` is only attached to links and only when non-empty. Image blocks
/// and empty ranges come back unchanged.
pub fn toggle_mark(
    block: &Block,
    mark_type: MarkType,
    range: Range<usize>,
    href: Option<&str>,
) -> Block {
    if block.is_image() || range.start >= range.end || range.end > block.len() {
        return block.clone();
    }

    let mut next = block.clone();
    if let Some(index) = block
        .marks
        .iter()
        .position(|m| m.mark_type == mark_type && m.covers(&range))
    {
        next.marks.remove(index);
        return next;
    }

    next.marks.push(new_mark(mark_type, range, href));
    next
}

/// Remove the mark covering `range`, if any. Never adds.
pub fn remove_mark(block: &Block, mark_type: MarkType, range: Range<usize>) -> Block {
    if has_mark(block, mark_type, &range) {
        toggle_mark(block, mark_type, range, None)
    } else {
        block.clone()
    }
}

fn new_mark(mark_type: MarkType, range: Range<usize>, href: Option<&str>) -> Mark {
    match (mark_type, href.map(str::trim)) {
        (MarkType::Link, Some(href)) if !href.is_empty() => Mark::link(range, href),
        _ => Mark::new(mark_type, range),
    }
}

/// Clip marks to a new content length after the text was replaced.
///
/// Marks that end past `len` are shortened; marks left empty are dropped.
pub(crate) fn clip_marks(marks: &[Mark], len: usize) -> Vec<Mark> {
    marks
        .iter()
        .filter(|m| m.start < len)
        .map(|m| Mark {
            end: m.end.min(len),
            ..m.clone()
        })
        .collect()
}
