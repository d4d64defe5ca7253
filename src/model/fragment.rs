//! Positioned text fragments as produced by a PDF decoder.

use serde::{Deserialize, Serialize};

use super::BBox;

/// PDF text render mode (the `Tr` operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Fill,
    Stroke,
    FillStroke,
    /// Neither filled nor stroked (mode 3), common for OCR layers
    Invisible,
    FillClip,
    StrokeClip,
    FillStrokeClip,
    /// Adds to the clipping path only (mode 7)
    Clip,
}

impl RenderMode {
    /// Map a `Tr` operand to a render mode. Out-of-range values paint as fill.
    pub fn from_operand(value: i64) -> Self {
        match value {
            1 => RenderMode::Stroke,
            2 => RenderMode::FillStroke,
            3 => RenderMode::Invisible,
            4 => RenderMode::FillClip,
            5 => RenderMode::StrokeClip,
            6 => RenderMode::FillStrokeClip,
            7 => RenderMode::Clip,
            _ => RenderMode::Fill,
        }
    }

    /// Whether text drawn in this mode leaves marks on the page.
    pub fn is_visible(self) -> bool {
        !matches!(self, RenderMode::Invisible | RenderMode::Clip)
    }
}

/// Non-stroking (fill) colour as RGB components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for FillColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FillColor {
    pub const BLACK: FillColor = FillColor { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: FillColor = FillColor { r: 1.0, g: 1.0, b: 1.0 };

    /// Lightest channel value at which text on a white page is unreadable.
    pub const NEAR_WHITE: f32 = 0.95;

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// DeviceGray (`g`).
    pub fn gray(level: f32) -> Self {
        Self::rgb(level, level, level)
    }

    /// DeviceCMYK (`k`), naive conversion.
    pub fn cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        Self::rgb(
            (1.0 - c.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - m.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - y.clamp(0.0, 1.0)) * (1.0 - k),
        )
    }

    /// Every channel above [`FillColor::NEAR_WHITE`].
    pub fn is_near_white(&self) -> bool {
        self.r.min(self.g).min(self.b) > Self::NEAR_WHITE
    }
}

/// A minimal unit of positioned text with one consistent font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The text content
    pub text: String,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Page-relative bounding box
    pub bbox: BBox,
    /// Page number (1-based)
    pub page: u32,
    /// How the text is painted
    pub render_mode: RenderMode,
    /// Fill colour in effect when the text was shown
    #[serde(default)]
    pub fill: FillColor,
    /// Whether the font appears to be bold
    pub is_bold: bool,
    /// Whether the font appears to be italic
    pub is_italic: bool,
}

impl TextFragment {
    /// Create a new fragment, deriving bold/italic from the font name.
    pub fn new(
        text: impl Into<String>,
        font_name: impl Into<String>,
        font_size: f32,
        bbox: BBox,
        page: u32,
    ) -> Self {
        let font_name = font_name.into();
        let lower = font_name.to_lowercase();
        let is_bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let is_italic = lower.contains("italic") || lower.contains("oblique");

        Self {
            text: text.into(),
            font_name,
            font_size,
            bbox,
            page,
            render_mode: RenderMode::Fill,
            fill: FillColor::BLACK,
            is_bold,
            is_italic,
        }
    }

    /// Set the render mode.
    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Set the fill colour.
    pub fn with_fill(mut self, fill: FillColor) -> Self {
        self.fill = fill;
        self
    }

    /// Number of characters in the fragment text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the fragment leaves readable marks: painted, and not in
    /// near-white ink.
    pub fn is_visible(&self) -> bool {
        self.render_mode.is_visible() && !self.fill.is_near_white()
    }

    /// Why this fragment cannot take part in layout analysis, if it can't.
    pub fn defect(&self) -> Option<&'static str> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            Some("missing font size")
        } else if self.bbox.is_degenerate() {
            Some("zero-area bounding box")
        } else {
            None
        }
    }
}

/// All fragments of one page, plus the page size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-based)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Fragments on this page, in decoder order
    pub fragments: Vec<TextFragment>,
}

impl PageLayout {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            fragments: Vec::new(),
        }
    }

    /// US Letter page (612 x 792 points).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a fragment to the page.
    pub fn push(&mut self, fragment: TextFragment) {
        self.fragments.push(fragment);
    }
}

/// The fragment stream of a whole document, one entry per page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentCorpus {
    pub pages: Vec<PageLayout>,
}

impl FragmentCorpus {
    pub fn new(pages: Vec<PageLayout>) -> Self {
        Self { pages }
    }

    /// Number of pages, including pages without text.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of the first page (1 for an empty corpus).
    pub fn first_page(&self) -> u32 {
        self.pages.iter().map(|p| p.number).min().unwrap_or(1)
    }

    /// Look up a page by number.
    pub fn page(&self, number: u32) -> Option<&PageLayout> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// Total fragment count.
    pub fn fragment_count(&self) -> usize {
        self.pages.iter().map(|p| p.fragments.len()).sum()
    }
}
