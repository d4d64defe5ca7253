//! Span merging: coalesce raw fragments into logical lines.

use rayon::prelude::*;

use super::options::MergeOptions;
use crate::model::{BBox, FragmentCorpus, Line, PageLayout, SizeKey, TextFragment};

/// A line still accepting fragments.
struct OpenLine {
    fragments: Vec<TextFragment>,
    bbox: BBox,
    visible: bool,
    /// (size key, size, chars, width) per distinct size, in insertion order
    sizes: Vec<(SizeKey, f32, usize, f32)>,
}

impl OpenLine {
    fn start(fragment: TextFragment) -> Self {
        let mut line = Self {
            bbox: fragment.bbox,
            visible: fragment.is_visible(),
            fragments: Vec::new(),
            sizes: Vec::new(),
        };
        line.push(fragment);
        line
    }

    fn push(&mut self, fragment: TextFragment) {
        let key = SizeKey::from_size(fragment.font_size);
        let chars = fragment.char_count();
        let width = fragment.bbox.width();
        match self.sizes.iter_mut().find(|(k, ..)| *k == key) {
            Some(entry) => {
                entry.2 += chars;
                entry.3 += width;
            }
            None => self.sizes.push((key, fragment.font_size, chars, width)),
        }
        self.bbox = self.bbox.union(&fragment.bbox);
        self.fragments.push(fragment);
    }

    fn dominant(&self) -> (f32, usize, f32) {
        let mut best = self.sizes[0];
        for entry in &self.sizes[1..] {
            if entry.2 > best.2 {
                best = *entry;
            }
        }
        (best.1, best.2, best.3)
    }

    fn font_size(&self) -> f32 {
        self.dominant().0
    }

    fn avg_char_width(&self) -> f32 {
        let (size, chars, width) = self.dominant();
        if chars > 0 && width > 0.0 {
            width / chars as f32
        } else {
            size * 0.5
        }
    }

    /// Horizontal gap to the fragment if it may join this line.
    fn join_gap(&self, fragment: &TextFragment, opts: &MergeOptions) -> Option<f32> {
        if self.visible != fragment.is_visible() {
            return None;
        }

        let smaller = self.font_size().min(fragment.font_size);
        let center_diff = (self.bbox.center_y() - fragment.bbox.center_y()).abs();
        if center_diff >= opts.baseline_tolerance * smaller {
            return None;
        }

        let gap = self.bbox.horizontal_gap(&fragment.bbox);
        (gap < opts.contiguity_factor * self.avg_char_width()).then_some(gap)
    }
}

/// Merge the fragments of one page into lines ordered by (top, x0).
pub fn merge_page(page: &PageLayout, opts: &MergeOptions) -> Vec<Line> {
    let mut fragments: Vec<TextFragment> = page
        .fragments
        .iter()
        .filter(|f| {
            if let Some(defect) = f.defect() {
                log::warn!(
                    "Skipping fragment {:?} on page {}: {}",
                    f.text,
                    page.number,
                    defect
                );
                false
            } else if f.page != page.number {
                log::warn!(
                    "Skipping fragment {:?}: claims page {} but belongs to page {}",
                    f.text,
                    f.page,
                    page.number
                );
                false
            } else {
                true
            }
        })
        .cloned()
        .collect();

    fragments.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut open: Vec<OpenLine> = Vec::new();
    for fragment in fragments {
        let target = open
            .iter()
            .enumerate()
            .filter_map(|(i, line)| line.join_gap(&fragment, opts).map(|gap| (i, gap)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);

        match target {
            Some(i) => open[i].push(fragment),
            None => open.push(OpenLine::start(fragment)),
        }
    }

    let mut lines: Vec<Line> = open
        .into_iter()
        .map(|l| Line::from_fragments(l.fragments, opts.space_factor))
        .collect();
    lines.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    log::debug!(
        "Page {}: merged {} fragments into {} lines",
        page.number,
        page.fragments.len(),
        lines.len()
    );
    lines
}

/// Merge every page of the corpus, keeping page order.
pub fn merge_corpus(corpus: &FragmentCorpus, opts: &MergeOptions, parallel: bool) -> Vec<Line> {
    let per_page: Vec<Vec<Line>> = if parallel {
        corpus
            .pages
            .par_iter()
            .map(|page| merge_page(page, opts))
            .collect()
    } else {
        corpus
            .pages
            .iter()
            .map(|page| merge_page(page, opts))
            .collect()
    };

    per_page.into_iter().flatten().collect()
}
