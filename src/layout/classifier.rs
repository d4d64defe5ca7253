//! Heading classification from document-wide font statistics.
//!
//! The hierarchy is global: it is computed once over every surviving line
//! and then applied page by page, so one font size always yields one level.

use std::collections::{BTreeMap, HashMap};

use super::options::HeadingOptions;
use crate::model::{HeadingLevel, Line, SizeKey};

/// Per-size counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeStats {
    /// Lines set in this size
    pub line_count: usize,
    /// Characters set in this size
    pub char_count: usize,
    /// Lines of this size on the first page
    pub first_page_lines: usize,
}

/// Corpus-wide statistics handed from collection to classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStats {
    /// Pages in the document, including pages without text
    pub page_count: usize,
    /// Number of the first page
    pub first_page: u32,
    /// Counters per rounded font size
    pub sizes: BTreeMap<SizeKey, SizeStats>,
    /// Dominant prose size, if the document has one
    pub body_size: Option<SizeKey>,
    /// Heading sizes, largest first
    pub hierarchy: Vec<SizeKey>,
}

impl DocumentStats {
    /// Gather statistics over the candidate lines.
    pub fn collect(lines: &[Line], page_count: usize, first_page: u32, opts: &HeadingOptions) -> Self {
        let mut sizes: BTreeMap<SizeKey, SizeStats> = BTreeMap::new();
        for line in lines {
            let entry = sizes.entry(line.size_key()).or_default();
            entry.line_count += 1;
            entry.char_count += line.char_count();
            if line.page == first_page {
                entry.first_page_lines += 1;
            }
        }

        let body_size = detect_body_size(&sizes, opts.body_min_avg_chars);

        let hierarchy: Vec<SizeKey> = if sizes.len() < 2 {
            Vec::new()
        } else {
            sizes
                .keys()
                .rev()
                .filter(|k| body_size.map_or(true, |body| **k > body))
                .copied()
                .collect()
        };

        log::debug!(
            "Font sizes: {}; body: {}; hierarchy: [{}]",
            sizes.len(),
            body_size.map_or_else(|| "none".to_string(), |b| b.to_string()),
            hierarchy
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self {
            page_count,
            first_page,
            sizes,
            body_size,
            hierarchy,
        }
    }

    /// Counters for one size.
    pub fn size(&self, key: SizeKey) -> Option<&SizeStats> {
        self.sizes.get(&key)
    }

    /// Whether the size is part of the heading hierarchy.
    pub fn is_heading_size(&self, key: SizeKey) -> bool {
        self.hierarchy.contains(&key)
    }
}

/// The size holding the most characters, if its lines read like prose.
fn detect_body_size(sizes: &BTreeMap<SizeKey, SizeStats>, min_avg_chars: f32) -> Option<SizeKey> {
    let mut best: Option<(SizeKey, &SizeStats)> = None;
    for (key, stats) in sizes {
        if best.map_or(true, |(_, b)| stats.char_count > b.char_count) {
            best = Some((*key, stats));
        }
    }

    let (key, stats) = best?;
    if sizes.len() < 2 {
        return Some(key);
    }
    let avg = stats.char_count as f32 / stats.line_count.max(1) as f32;
    (avg >= min_avg_chars).then_some(key)
}

/// Why a line is not part of the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Not a heading size
    BodyText,
    /// Heading size deeper than the configured depth
    BeyondDepth,
    /// Set in the title size away from the first page
    TitleSizeElsewhere,
    /// Longer than a heading label
    TooLong,
    /// Too few characters to label a section
    TooShort,
    /// Ends like a sentence
    SentenceTerminator,
    /// No letters at all
    NoLetters,
    /// URL or e-mail address
    Link,
    /// Table-of-contents leader dots
    DotLeader,
}

/// Role assigned to a candidate line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Title,
    Heading(HeadingLevel),
    Discarded(DiscardReason),
}

/// A line with its assigned role.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    pub line: Line,
    pub role: Role,
}

impl HeadingCandidate {
    pub fn is_discarded(&self) -> bool {
        matches!(self.role, Role::Discarded(_))
    }
}

/// Assigns title and heading levels.
pub struct HeadingClassifier<'a> {
    opts: &'a HeadingOptions,
}

impl<'a> HeadingClassifier<'a> {
    pub fn new(opts: &'a HeadingOptions) -> Self {
        Self { opts }
    }

    /// Classify every line against the document statistics.
    pub fn classify(&self, lines: &[Line], stats: &DocumentStats) -> Vec<HeadingCandidate> {
        let shapes: Vec<Option<DiscardReason>> =
            lines.iter().map(|l| self.shape_defect(&l.text)).collect();

        let title_size = self.title_size(stats);
        let fallback_title = match title_size {
            Some(_) => None,
            None => lines
                .iter()
                .zip(&shapes)
                .filter(|(l, shape)| {
                    shape.is_none() && l.page == stats.first_page && stats.is_heading_size(l.size_key())
                })
                .map(|(l, _)| l.size_key())
                .max(),
        };

        let levels: HashMap<SizeKey, HeadingLevel> = stats
            .hierarchy
            .iter()
            .filter(|k| Some(**k) != title_size)
            .zip(1..=self.opts.max_depth)
            .filter_map(|(k, depth)| HeadingLevel::new(depth).map(|level| (*k, level)))
            .collect();

        if let Some(size) = title_size {
            log::debug!("Title size: {size}");
        } else if let Some(size) = fallback_title {
            log::debug!("Title size (largest on first page): {size}");
        }

        lines
            .iter()
            .zip(shapes)
            .map(|(line, shape)| {
                let key = line.size_key();
                let on_first_page = line.page == stats.first_page;

                let role = if !stats.is_heading_size(key) {
                    Role::Discarded(DiscardReason::BodyText)
                } else if let Some(reason) = shape {
                    Role::Discarded(reason)
                } else if Some(key) == title_size {
                    if on_first_page {
                        Role::Title
                    } else {
                        Role::Discarded(DiscardReason::TitleSizeElsewhere)
                    }
                } else if on_first_page && Some(key) == fallback_title {
                    Role::Title
                } else {
                    match levels.get(&key) {
                        Some(level) => Role::Heading(*level),
                        None => Role::Discarded(DiscardReason::BeyondDepth),
                    }
                };

                log::debug!("Page {} {} {:?}: {:?}", line.page, key, line.text, role);
                HeadingCandidate {
                    line: line.clone(),
                    role,
                }
            })
            .collect()
    }

    /// The largest size, when it is rare and present on the first page.
    fn title_size(&self, stats: &DocumentStats) -> Option<SizeKey> {
        let largest = *stats.hierarchy.first()?;
        let counts = stats.size(largest)?;
        (counts.first_page_lines > 0 && counts.line_count <= self.opts.title_max_occurrences)
            .then_some(largest)
    }

    /// Why the text cannot be a heading, if it can't.
    fn shape_defect(&self, text: &str) -> Option<DiscardReason> {
        let lower = text.to_lowercase();

        if text.chars().count() > self.opts.max_heading_chars {
            Some(DiscardReason::TooLong)
        } else if text.chars().filter(|c| !c.is_whitespace()).count() < self.opts.min_heading_chars {
            Some(DiscardReason::TooShort)
        } else if text.matches('.').count() > self.opts.max_dots {
            Some(DiscardReason::DotLeader)
        } else if lower.contains("http") || lower.contains("www.") || text.contains('@') {
            Some(DiscardReason::Link)
        } else if !text.chars().any(char::is_alphabetic) {
            Some(DiscardReason::NoLetters)
        } else if text.ends_with(['.', ',', ';']) {
            Some(DiscardReason::SentenceTerminator)
        } else {
            None
        }
    }
}
