use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Inline formatting kinds that can be applied to a span of block text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Strong,
    Em,
    Underline,
    Link,
}

impl MarkType {
    pub const ALL: [MarkType; 4] = [
        MarkType::Strong,
        MarkType::Em,
        MarkType::Underline,
        MarkType::Link,
    ];

    /// Name used in the persisted shape
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkType::Strong => "strong",
            MarkType::Em => "em",
            MarkType::Underline => "underline",
            MarkType::Link => "link",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "strong" => Some(MarkType::Strong),
            "em" => Some(MarkType::Em),
            "underline" => Some(MarkType::Underline),
            "link" => Some(MarkType::Link),
            _ => None,
        }
    }
}

impl fmt::Display for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inline formatting annotation over `[start, end)` of a block's content.
///
/// Offsets count `char`s, not bytes. Marks are values: toggling formatting
/// replaces marks in a block rather than editing them in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mark {
    pub mark_type: MarkType,
    pub start: usize,
    pub end: usize,
    /// Only ever present on `MarkType::Link`
    pub href: Option<String>,
}

impl Mark {
    pub fn new(mark_type: MarkType, range: Range<usize>) -> Self {
        Self {
            mark_type,
            start: range.start,
            end: range.end,
            href: None,
        }
    }

    pub fn link(range: Range<usize>, href: impl Into<String>) -> Self {
        Self {
            mark_type: MarkType::Link,
            start: range.start,
            end: range.end,
            href: Some(href.into()),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// True when this mark's span fully contains `range`
    pub fn covers(&self, range: &Range<usize>) -> bool {
        self.start <= range.start && self.end >= range.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_type_names_roundtrip() {
        for mark_type in MarkType::ALL {
            assert_eq!(MarkType::parse(mark_type.as_str()), Some(mark_type));
        }
        assert_eq!(MarkType::parse("strike"), None);
    }

    #[test]
    fn test_covers_is_containment_not_overlap() {
        let mark = Mark::new(MarkType::Strong, 2..6);

        assert!(mark.covers(&(2..6)));
        assert!(mark.covers(&(3..5)));
        assert!(!mark.covers(&(1..4)));
        assert!(!mark.covers(&(5..7)));
    }

    #[test]
    fn test_link_constructor_sets_href() {
        let mark = Mark::link(0..4, "https://example.com");
        assert_eq!(mark.mark_type, MarkType::Link);
        assert_eq!(mark.href.as_deref(), Some("https://example.com"));
    }
}
