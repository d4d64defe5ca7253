//! Logical text lines merged from fragments.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BBox, TextFragment};

/// Font size rounded to 0.1pt.
///
/// Every size comparison in the pipeline goes through this key so that
/// 17.99pt and 18.0pt land on the same heading level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SizeKey(i32);

impl SizeKey {
    pub fn from_size(size: f32) -> Self {
        SizeKey((size * 10.0).round() as i32)
    }

    /// The size in points.
    pub fn points(self) -> f32 {
        self.0 as f32 / 10.0
    }
}

impl fmt::Display for SizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}pt", self.points())
    }
}

/// A merged run of fragments representing one visual text line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Member fragments, left to right
    pub fragments: Vec<TextFragment>,
    /// Joined, trimmed text
    pub text: String,
    /// Dominant font size
    pub font_size: f32,
    /// Union of the member bounding boxes
    pub bbox: BBox,
    /// Page number (1-based)
    pub page: u32,
}

impl Line {
    /// Build a line from fragments of one page.
    ///
    /// `space_factor` is the gap, as a fraction of the average character
    /// width, above which a space is inserted between adjacent fragments.
    pub fn from_fragments(mut fragments: Vec<TextFragment>, space_factor: f32) -> Self {
        if fragments.is_empty() {
            return Self {
                fragments,
                text: String::new(),
                font_size: 0.0,
                bbox: BBox::new(0.0, 0.0, 0.0, 0.0),
                page: 0,
            };
        }

        fragments.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

        let font_size = dominant_size(&fragments);
        let bbox = fragments
            .iter()
            .skip(1)
            .fold(fragments[0].bbox, |acc, f| acc.union(&f.bbox));
        let page = fragments[0].page;
        let text = join_fragments(&fragments, space_factor);

        Self {
            fragments,
            text,
            font_size,
            bbox,
            page,
        }
    }

    /// Rounded dominant size.
    pub fn size_key(&self) -> SizeKey {
        SizeKey::from_size(self.font_size)
    }

    /// Number of characters in the merged text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether any member fragment is readable on the page.
    pub fn is_visible(&self) -> bool {
        self.fragments.iter().any(|f| f.is_visible())
    }

    /// Average character width of the fragments set in the dominant size.
    pub fn avg_char_width(&self) -> f32 {
        let key = self.size_key();
        let (width, chars) = self
            .fragments
            .iter()
            .filter(|f| SizeKey::from_size(f.font_size) == key)
            .fold((0.0f32, 0usize), |(w, c), f| {
                (w + f.bbox.width(), c + f.char_count())
            });
        if chars > 0 && width > 0.0 {
            width / chars as f32
        } else {
            self.font_size * 0.5
        }
    }
}

/// The size with the greatest total character count; ties go to the size
/// seen first (left-most).
fn dominant_size(fragments: &[TextFragment]) -> f32 {
    let mut totals: Vec<(SizeKey, f32, usize)> = Vec::new();
    for frag in fragments {
        let key = SizeKey::from_size(frag.font_size);
        match totals.iter_mut().find(|(k, _, _)| *k == key) {
            Some(entry) => entry.2 += frag.char_count(),
            None => totals.push((key, frag.font_size, frag.char_count())),
        }
    }

    let mut best = totals[0];
    for entry in &totals[1..] {
        if entry.2 > best.2 {
            best = *entry;
        }
    }
    best.1
}

/// Join fragment texts, inserting spaces where the horizontal gap suggests one.
///
/// No space is inserted between characters of scripts that don't use word
/// spaces (Chinese, Japanese).
fn join_fragments(fragments: &[TextFragment], space_factor: f32) -> String {
    let mut result = String::new();

    for (i, frag) in fragments.iter().enumerate() {
        if i == 0 {
            result.push_str(&frag.text);
            continue;
        }

        let prev = &fragments[i - 1];
        let gap = frag.bbox.x0 - prev.bbox.x1;

        let char_count = frag.char_count();
        let avg_char_width = if char_count > 0 && frag.bbox.width() > 0.0 {
            frag.bbox.width() / char_count as f32
        } else {
            frag.font_size * 0.5
        };

        let should_insert_space = if gap > avg_char_width * space_factor {
            let prev_is_cjk = prev
                .text
                .chars()
                .last()
                .map(is_spaceless_script_char)
                .unwrap_or(false);
            let curr_is_cjk = frag
                .text
                .chars()
                .next()
                .map(is_spaceless_script_char)
                .unwrap_or(false);
            !(prev_is_cjk && curr_is_cjk)
        } else {
            false
        };

        let prev_ends_with_space = result.ends_with(' ') || result.ends_with('\u{00A0}');
        let curr_starts_with_space = frag.text.starts_with(' ') || frag.text.starts_with('\u{00A0}');

        if should_insert_space && !prev_ends_with_space && !curr_starts_with_space {
            result.push(' ');
        }

        result.push_str(&frag.text);
    }

    result.trim().to_string()
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub(crate) fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
