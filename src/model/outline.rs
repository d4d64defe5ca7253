//! The final outline artifact.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Heading depth, 1 (`H1`) to 6 (`H6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Deepest supported level.
    pub const MAX: u8 = 6;

    /// Create a level, returning `None` outside 1..=6.
    pub fn new(depth: u8) -> Option<Self> {
        (1..=Self::MAX).contains(&depth).then_some(HeadingLevel(depth))
    }

    pub fn depth(self) -> u8 {
        self.0
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HeadingLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.strip_prefix('H')
            .and_then(|d| d.parse::<u8>().ok())
            .and_then(HeadingLevel::new)
            .ok_or_else(|| de::Error::custom(format!("invalid heading level: {raw}")))
    }
}

/// One heading of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// Document title plus ordered, leveled headings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Inferred title (empty when none was found)
    pub title: String,
    /// Headings ordered by page, then vertical position
    pub outline: Vec<OutlineEntry>,
}

impl Outline {
    /// Whether neither a title nor any heading was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty()
    }

    /// Headings at a given level.
    pub fn at_level(&self, level: HeadingLevel) -> impl Iterator<Item = &OutlineEntry> {
        self.outline.iter().filter(move |e| e.level == level)
    }
}
