//! Artifact removal: hidden text, garbage glyphs and repeated page furniture.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::options::{ArtifactOptions, OutlineConfig};
use crate::error::Result;
use crate::model::{Line, PageLayout};

/// What the artifact filter removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactReport {
    /// Lines that are not painted, too small, or off the page
    pub invisible: usize,
    /// Lines without meaningful characters
    pub suspicious: usize,
    /// Lines removed as running headers or footers
    pub repeated: usize,
    /// Normalized keys of the removed header/footer groups
    pub repeated_keys: Vec<String>,
}

impl ArtifactReport {
    /// Total number of removed lines.
    pub fn total(&self) -> usize {
        self.invisible + self.suspicious + self.repeated
    }
}

/// Top or bottom margin band of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Top,
    Bottom,
}

/// Removes lines that are not real content.
pub struct ArtifactFilter {
    opts: ArtifactOptions,
    footer_patterns: Vec<Regex>,
}

impl ArtifactFilter {
    /// Create a filter, compiling the footer patterns of the configuration.
    pub fn new(config: &OutlineConfig) -> Result<Self> {
        Ok(Self {
            opts: config.artifacts.clone(),
            footer_patterns: config.footer_regexes()?,
        })
    }

    /// Remove artifacts from `lines`.
    ///
    /// `pages` supplies page sizes and the page count; pages without text
    /// still count.
    pub fn filter(&self, lines: Vec<Line>, pages: &[PageLayout]) -> (Vec<Line>, ArtifactReport) {
        let sizes: HashMap<u32, (f32, f32)> =
            pages.iter().map(|p| (p.number, (p.width, p.height))).collect();
        let mut report = ArtifactReport::default();

        let mut kept = Vec::with_capacity(lines.len());
        for line in lines {
            let size = sizes.get(&line.page).copied();
            if self.is_invisible(&line, size) {
                log::debug!("Removing invisible line on page {}: {:?}", line.page, line.text);
                report.invisible += 1;
            } else if is_suspicious(&line.text) {
                log::debug!("Removing suspicious line on page {}: {:?}", line.page, line.text);
                report.suspicious += 1;
            } else {
                kept.push(line);
            }
        }

        if pages.len() < self.opts.min_pages {
            log::debug!(
                "Skipping header/footer detection: {} pages < {}",
                pages.len(),
                self.opts.min_pages
            );
            return (kept, report);
        }

        let threshold = ((self.opts.repeat_fraction * pages.len() as f32).ceil() as usize).max(2);
        let mut remove: BTreeSet<usize> = BTreeSet::new();

        // Running headers and footers: the same text on enough pages
        for (key, members) in group_by(&kept, text_key) {
            self.sweep(&kept, &key, &members, threshold, &sizes, &mut remove, &mut report);
        }

        // Footer-like text that differs only in its numbers ("Page 2 of 9")
        for (key, members) in group_by(&kept, normalize_key) {
            let footers: Vec<usize> = members
                .into_iter()
                .filter(|&i| self.is_footer_like(&kept[i].text))
                .collect();
            self.sweep(&kept, &key, &footers, 2, &sizes, &mut remove, &mut report);
        }

        report.repeated = remove.len();
        let kept = kept
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !remove.contains(i))
            .map(|(_, line)| line)
            .collect();

        (kept, report)
    }

    /// Mark a group for removal when it spans `min_pages` distinct pages
    /// and every member sits in the same margin band.
    #[allow(clippy::too_many_arguments)]
    fn sweep(
        &self,
        kept: &[Line],
        key: &str,
        members: &[usize],
        min_pages: usize,
        sizes: &HashMap<u32, (f32, f32)>,
        remove: &mut BTreeSet<usize>,
        report: &mut ArtifactReport,
    ) {
        let distinct_pages: BTreeSet<u32> = members.iter().map(|&i| kept[i].page).collect();
        if distinct_pages.len() < min_pages {
            return;
        }
        let Some(band) = self.common_band(members.iter().map(|&i| &kept[i]), sizes) else {
            return;
        };

        let before = remove.len();
        remove.extend(members.iter().copied());
        if remove.len() > before {
            log::debug!(
                "Removing {:?} band group {:?}: {} lines on {} pages",
                band,
                key,
                members.len(),
                distinct_pages.len()
            );
            report.repeated_keys.push(key.to_string());
        }
    }

    fn is_footer_like(&self, text: &str) -> bool {
        self.footer_patterns.iter().any(|re| re.is_match(text))
    }

    fn is_invisible(&self, line: &Line, page_size: Option<(f32, f32)>) -> bool {
        if !line.is_visible() || line.font_size < self.opts.min_visible_size {
            return true;
        }
        page_size.is_some_and(|(w, h)| line.bbox.is_outside(w, h))
    }

    /// The band every line sits in, if they all share one.
    fn common_band<'a>(
        &self,
        mut lines: impl Iterator<Item = &'a Line>,
        sizes: &HashMap<u32, (f32, f32)>,
    ) -> Option<Band> {
        let first = self.band_of(lines.next()?, sizes)?;
        lines
            .all(|l| self.band_of(l, sizes) == Some(first))
            .then_some(first)
    }

    fn band_of(&self, line: &Line, sizes: &HashMap<u32, (f32, f32)>) -> Option<Band> {
        let (_, height) = sizes.get(&line.page)?;
        let center = line.bbox.center_y();
        let margin = self.opts.margin_fraction * height;
        if center <= margin {
            Some(Band::Top)
        } else if center >= height - margin {
            Some(Band::Bottom)
        } else {
            None
        }
    }
}

/// Line indices grouped by a text key, in key order.
fn group_by(lines: &[Line], key: fn(&str) -> String) -> BTreeMap<String, Vec<usize>> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, line) in lines.iter().enumerate() {
        groups.entry(key(&line.text)).or_default().push(i);
    }
    groups
}

/// Key for identical-text grouping: NFC, collapsed whitespace, lowercase.
pub fn text_key(text: &str) -> String {
    let normalized: String = text.nfc().collect();
    normalized
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Key for footer-pattern grouping: [`text_key`] with digit runs replaced by `#`.
pub fn normalize_key(text: &str) -> String {
    let text = text_key(text);
    let mut key = String::with_capacity(text.len());
    let mut in_digits = false;
    for c in text.chars() {
        if c.is_ascii_digit() {
            if !in_digits {
                key.push('#');
            }
            in_digits = true;
        } else {
            key.push(c);
            in_digits = false;
        }
    }
    key
}

/// Empty, or only control, format, replacement and private-use characters.
fn is_suspicious(text: &str) -> bool {
    let mut meaningful = text.chars().filter(|c| !c.is_whitespace()).peekable();
    if meaningful.peek().is_none() {
        return true;
    }
    meaningful.all(|c| c.is_control() || is_format(c) || c == '\u{FFFD}' || is_private_use(c))
}

/// General category Cf: zero-width spaces and joiners, BOM, soft hyphen,
/// bidi controls, tag characters.
fn is_format(c: char) -> bool {
    matches!(
        c as u32,
        0x00AD
            | 0x0600..=0x0605
            | 0x061C
            | 0x06DD
            | 0x070F
            | 0x0890..=0x0891
            | 0x08E2
            | 0x180E
            | 0x200B..=0x200F
            | 0x202A..=0x202E
            | 0x2060..=0x2064
            | 0x2066..=0x206F
            | 0xFEFF
            | 0xFFF9..=0xFFFB
            | 0x110BD
            | 0x110CD
            | 0x13430..=0x1343F
            | 0x1BCA0..=0x1BCA3
            | 0x1D173..=0x1D17A
            | 0xE0001
            | 0xE0020..=0xE007F
    )
}

fn is_private_use(c: char) -> bool {
    matches!(c as u32, 0xE000..=0xF8FF | 0xF0000..=0xFFFFD | 0x100000..=0x10FFFD)
}
