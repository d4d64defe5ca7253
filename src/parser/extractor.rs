//! Content-stream interpretation: turn page operators into positioned fragments.

use std::collections::HashMap;

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};
use crate::error::Result;
use crate::model::{
    is_spaceless_script_char, BBox, FillColor, FragmentCorpus, PageLayout, RenderMode,
    TextFragment,
};

/// Estimated glyph advance as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;
/// Portion of the font size above the baseline.
const ASCENT: f32 = 0.8;
/// TJ adjustment (thousandths of an em) treated as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Text matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn from_operands(ops: &[PdfValue]) -> Option<Self> {
        let n: Vec<f32> = ops.iter().take(6).map(PdfValue::as_number).collect::<Option<_>>()?;
        match *n.as_slice() {
            [a, b, c, d, e, f] => Some(Self { a, b, c, d, e, f }),
            _ => None,
        }
    }

    /// Translate in text space.
    fn translate(self, tx: f32, ty: f32) -> Self {
        Self {
            e: self.e + tx * self.a + ty * self.c,
            f: self.f + tx * self.b + ty * self.d,
            ..self
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Graphics state relevant to text.
struct TextState {
    matrix: TextMatrix,
    line_matrix: TextMatrix,
    font_resource: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
    render_mode: RenderMode,
    fill: FillColor,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: TextMatrix::default(),
            line_matrix: TextMatrix::default(),
            font_resource: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: 0.0,
            render_mode: RenderMode::Fill,
            fill: FillColor::BLACK,
            in_text: false,
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = self.line_matrix.translate(tx, ty);
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// Apply `g`/`rg`/`k` style operands, or `sc`/`scn` by operand count.
    fn set_fill(&mut self, components: &[f32]) {
        self.fill = match *components {
            [gray] => FillColor::gray(gray),
            [r, g, b] => FillColor::rgb(r, g, b),
            [c, m, y, k] => FillColor::cmyk(c, m, y, k),
            _ => return,
        };
    }
}

/// Extracts a [`FragmentCorpus`] from any [`PdfBackend`].
pub struct FragmentExtractor<B: PdfBackend> {
    backend: B,
}

impl<B: PdfBackend> FragmentExtractor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Interpret every page. Pages whose content cannot be decoded are kept
    /// empty so the page count stays right.
    pub fn extract(&self) -> Result<FragmentCorpus> {
        let pages = self.backend.pages();
        let mut corpus = FragmentCorpus::default();

        for (number, id) in pages {
            let (width, height) = self.backend.page_size(id);
            let mut page = PageLayout::new(number, width, height);

            match self.extract_page(number, id, height) {
                Ok(fragments) => page.fragments = fragments,
                Err(e) => log::warn!("Page {}: cannot decode content: {}", number, e),
            }

            log::debug!("Page {}: {} fragments", number, page.fragments.len());
            corpus.pages.push(page);
        }

        Ok(corpus)
    }

    fn extract_page(&self, number: u32, id: PageId, height: f32) -> Result<Vec<TextFragment>> {
        let fonts: HashMap<Vec<u8>, String> = match self.backend.page_fonts(id) {
            Ok(fonts) => fonts.into_iter().map(|f| (f.name, f.base_font)).collect(),
            Err(e) => {
                log::warn!("Page {}: cannot read fonts: {}", number, e);
                HashMap::new()
            }
        };

        let content = self.backend.page_content(id)?;
        let ops = self.backend.decode_content(&content)?;
        Ok(self.interpret(&ops, number, id, height, &fonts))
    }

    fn interpret(
        &self,
        ops: &[ContentOp],
        number: u32,
        id: PageId,
        height: f32,
        fonts: &HashMap<Vec<u8>, String>,
    ) -> Vec<TextFragment> {
        let mut state = TextState::default();
        let mut saved_fills: Vec<FillColor> = Vec::new();
        let mut fragments = Vec::new();

        for op in ops {
            let num = |i: usize| op.operands.get(i).and_then(PdfValue::as_number);

            match op.operator.as_str() {
                "q" => saved_fills.push(state.fill),
                "Q" => {
                    if let Some(fill) = saved_fills.pop() {
                        state.fill = fill;
                    }
                }
                "g" | "rg" | "k" | "sc" | "scn" => {
                    // Pattern names in `scn` are not colours
                    let components: Vec<f32> =
                        op.operands.iter().filter_map(PdfValue::as_number).collect();
                    state.set_fill(&components);
                }
                "cs" => state.fill = FillColor::BLACK,
                "BT" => {
                    state.in_text = true;
                    state.matrix = TextMatrix::default();
                    state.line_matrix = TextMatrix::default();
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        state.font_name = fonts
                            .get(name)
                            .cloned()
                            .unwrap_or_else(|| String::from_utf8_lossy(name).into_owned());
                        state.font_resource = name.clone();
                    }
                    if let Some(size) = num(1) {
                        state.font_size = size;
                    }
                }
                "Tr" => {
                    if let Some(PdfValue::Integer(mode)) = op.operands.first() {
                        state.render_mode = RenderMode::from_operand(*mode);
                    }
                }
                "TL" => {
                    if let Some(leading) = num(0) {
                        state.leading = leading;
                    }
                }
                "Td" => {
                    if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                        state.move_line(tx, ty);
                    }
                }
                "TD" => {
                    if let (Some(tx), Some(ty)) = (num(0), num(1)) {
                        state.leading = -ty;
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(matrix) = TextMatrix::from_operands(&op.operands) {
                        state.matrix = matrix;
                        state.line_matrix = matrix;
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                        let items = [PdfValue::Str(bytes.clone())];
                        self.show(&mut state, &items, number, id, height, &mut fragments);
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = op.operands.first() {
                        self.show(&mut state, items, number, id, height, &mut fragments);
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(PdfValue::Str(bytes)) = op.operands.get(text_idx) {
                        let items = [PdfValue::Str(bytes.clone())];
                        self.show(&mut state, &items, number, id, height, &mut fragments);
                    }
                }
                _ => {}
            }
        }

        fragments
    }

    /// Show a TJ-style array of strings and spacing adjustments as one fragment.
    fn show(
        &self,
        state: &mut TextState,
        items: &[PdfValue],
        number: u32,
        id: PageId,
        height: f32,
        out: &mut Vec<TextFragment>,
    ) {
        if !state.in_text {
            return;
        }

        let mut text = String::new();
        // Advance in unscaled text space
        let mut advance = 0.0f32;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let decoded = self.backend.decode_text(id, &state.font_resource, bytes);
                    advance += decoded.chars().count() as f32 * state.font_size * GLYPH_WIDTH;
                    text.push_str(&decoded);
                }
                other => {
                    let Some(adjustment) = other.as_number().map(|n| -n) else {
                        continue;
                    };
                    advance += adjustment / 1000.0 * state.font_size;
                    let wants_space = adjustment > TJ_SPACE_THRESHOLD
                        && !text.ends_with(' ')
                        && !text.ends_with('\u{00A0}')
                        && text.chars().last().is_some_and(|c| !is_spaceless_script_char(c));
                    if wants_space {
                        text.push(' ');
                    }
                }
            }
        }

        let start = state.matrix;
        state.matrix = state.matrix.translate(advance, 0.0);

        if text.trim().is_empty() {
            return;
        }

        let size = state.font_size * start.vertical_scale();
        let width = advance.max(0.0) * start.horizontal_scale();
        let top = height - start.f - size * ASCENT;
        let bbox = BBox::new(start.e, top, start.e + width, top + size);

        out.push(
            TextFragment::new(text, state.font_name.clone(), size, bbox, number)
                .with_render_mode(state.render_mode)
                .with_fill(state.fill),
        );
    }
}
