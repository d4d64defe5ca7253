//! # pdfoutline
//!
//! Infer a PDF's title and heading hierarchy from typography and layout.
//!
//! Embedded bookmarks are ignored. Headings are recovered from positioned
//! text alone: fragments are merged into lines, page furniture and tables
//! are filtered out, and the remaining font sizes are mapped onto a
//! document-wide `H1..Hn` hierarchy.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{outline_file, write_outline, JsonFormat, OutlineConfig};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let outline = outline_file("report.pdf", &OutlineConfig::default())?;
//!     println!("{}", outline.title);
//!
//!     write_outline(&outline, "report_outline.json", JsonFormat::Pretty)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Span merging**: fragments on one baseline become lines (parallel per page)
//! - **Artifact filtering**: hidden text, garbage glyphs, running headers/footers
//! - **Table detection**: grid-aligned blocks never become headings
//! - **Classification**: global font-size hierarchy, title detection, shape rules
//! - **Outline building**: ordering and de-duplication

pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use layout::{
    ArtifactOptions, ArtifactReport, Collection, DocumentStats, HeadingCandidate, HeadingOptions,
    MergeOptions, OutlineConfig, Role, TableOptions, TableRegion,
};
pub use model::{
    BBox, FillColor, FragmentCorpus, HeadingLevel, Line, Outline, OutlineEntry, PageLayout,
    RenderMode, SizeKey, TextFragment,
};
pub use parser::{FragmentExtractor, LopdfBackend, PdfBackend};
pub use render::{to_json, JsonFormat};

use std::fs;
use std::path::Path;

/// Infer an outline from an already decoded fragment corpus.
///
/// # Example
///
/// ```
/// use pdfoutline::{outline_from_fragments, BBox, FragmentCorpus, OutlineConfig, PageLayout, TextFragment};
///
/// let mut page = PageLayout::letter(1);
/// page.push(TextFragment::new("Quarterly Report", "Helvetica-Bold", 24.0, BBox::new(72.0, 60.0, 264.0, 84.0), 1));
/// page.push(TextFragment::new("Revenue", "Helvetica-Bold", 16.0, BBox::new(72.0, 120.0, 128.0, 136.0), 1));
///
/// let outline = outline_from_fragments(&FragmentCorpus::new(vec![page]), &OutlineConfig::default()).unwrap();
/// assert_eq!(outline.title, "Quarterly Report");
/// assert_eq!(outline.outline[0].text, "Revenue");
/// ```
pub fn outline_from_fragments(corpus: &FragmentCorpus, config: &OutlineConfig) -> Result<Outline> {
    layout::run(corpus, config)
}

/// Infer an outline from a PDF file.
///
/// Fails with [`Error::InputNotFound`] or [`Error::InputUnreadable`] before
/// any decoding happens.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{outline_file, OutlineConfig};
///
/// let outline = outline_file("document.pdf", &OutlineConfig::new().with_max_depth(3)).unwrap();
/// println!("{} headings", outline.outline.len());
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P, config: &OutlineConfig) -> Result<Outline> {
    let data = read_input(path.as_ref())?;
    outline_bytes(&data, config)
}

/// Infer an outline from PDF bytes.
pub fn outline_bytes(data: &[u8], config: &OutlineConfig) -> Result<Outline> {
    config.validate()?;
    let corpus = FragmentExtractor::new(LopdfBackend::load_bytes(data)?).extract()?;
    layout::run(&corpus, config)
}

/// Write an outline as UTF-8 JSON.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{write_outline, JsonFormat, Outline};
///
/// write_outline(&Outline::default(), "empty_outline.json", JsonFormat::Pretty).unwrap();
/// ```
pub fn write_outline<P: AsRef<Path>>(outline: &Outline, path: P, format: JsonFormat) -> Result<()> {
    render::write_json(outline, path, format)
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    fs::read(path).map_err(|source| Error::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Builder for extracting outlines.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::OutlineExtractor;
///
/// let outline = OutlineExtractor::new()
///     .with_max_depth(3)
///     .with_repeat_fraction(0.6)
///     .sequential()
///     .extract_file("document.pdf")?;
/// # Ok::<(), pdfoutline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    config: OutlineConfig,
}

impl OutlineExtractor {
    /// Create a new extractor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: OutlineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the deepest heading level.
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.config = self.config.with_max_depth(depth);
        self
    }

    /// Set the page fraction for header/footer detection.
    pub fn with_repeat_fraction(mut self, fraction: f32) -> Self {
        self.config = self.config.with_repeat_fraction(fraction);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.config = self.config.sequential();
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Extract from a PDF file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Outline> {
        outline_file(path, &self.config)
    }

    /// Extract from PDF bytes.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<Outline> {
        outline_bytes(data, &self.config)
    }

    /// Extract from decoded fragments.
    pub fn extract_fragments(&self, corpus: &FragmentCorpus) -> Result<Outline> {
        outline_from_fragments(corpus, &self.config)
    }
}
