//! Outline assembly from classified candidates.

use super::classifier::{HeadingCandidate, Role};
use crate::model::{Outline, OutlineEntry};

/// Assemble the final outline.
///
/// Discarded candidates are dropped, the rest ordered by page and position.
/// Title lines are joined with single spaces; consecutive duplicate
/// headings collapse into one entry.
pub fn build_outline(candidates: &[HeadingCandidate]) -> Outline {
    let mut kept: Vec<&HeadingCandidate> = candidates.iter().filter(|c| !c.is_discarded()).collect();
    kept.sort_by(|a, b| {
        a.line
            .page
            .cmp(&b.line.page)
            .then(a.line.bbox.top.total_cmp(&b.line.bbox.top))
            .then(a.line.bbox.x0.total_cmp(&b.line.bbox.x0))
    });

    let title = kept
        .iter()
        .filter(|c| c.role == Role::Title)
        .map(|c| c.line.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut outline: Vec<OutlineEntry> = Vec::new();
    for candidate in kept {
        let Role::Heading(level) = candidate.role else {
            continue;
        };
        let entry = OutlineEntry {
            level,
            text: candidate.line.text.clone(),
            page: candidate.line.page,
        };
        if outline.last() == Some(&entry) {
            log::debug!("Dropping duplicate heading {:?} on page {}", entry.text, entry.page);
            continue;
        }
        outline.push(entry);
    }

    log::debug!("Outline: title {:?}, {} headings", title, outline.len());
    Outline { title, outline }
}
