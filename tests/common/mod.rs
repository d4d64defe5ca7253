//! Shared fixtures for integration tests.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};
use pdfoutline::{BBox, FragmentCorpus, PageLayout, TextFragment};

/// A fragment with an estimated width of half the font size per character.
pub fn frag(text: &str, x: f32, top: f32, size: f32, page: u32) -> TextFragment {
    let width = text.chars().count() as f32 * size * 0.5;
    TextFragment::new(text, "Helvetica", size, BBox::new(x, top, x + width, top + size), page)
}

/// Paragraph filler that reads like body text.
pub const BODY: &str = "The quarterly figures continue the trend described in the previous issue";

/// Add `count` lines of 10pt body text starting at `top`.
pub fn push_body(page: &mut PageLayout, top: f32, count: usize) {
    for i in 0..count {
        let number = page.number;
        page.push(frag(BODY, 72.0, top + i as f32 * 14.0, 10.0, number));
    }
}

/// Three pages: a 24pt title, one 18pt chapter per page and an 8pt footer.
pub fn report_corpus() -> FragmentCorpus {
    let mut pages = Vec::new();
    for n in 1..=3u32 {
        let mut page = PageLayout::letter(n);
        if n == 1 {
            page.push(frag("Report Title", 72.0, 60.0, 24.0, n));
        }
        page.push(frag(&format!("Chapter {n}"), 72.0, 120.0, 18.0, n));
        page.push(frag(&format!("Page {n} of 3"), 280.0, 760.0, 8.0, n));
        pages.push(page);
    }
    FragmentCorpus::new(pages)
}

/// Build a PDF whose pages show `(text, x, baseline, size)` runs in Helvetica.
pub fn build_pdf(pages: &[Vec<(&str, f32, f32, f32)>]) -> Vec<u8> {
    let contents: Vec<String> = pages
        .iter()
        .map(|runs| {
            runs.iter()
                .map(|(text, x, y, size)| format!("BT /F1 {size} Tf {x} {y} Td ({text}) Tj ET\n"))
                .collect()
        })
        .collect();
    build_pdf_from_content(&contents)
}

/// Build a PDF with one raw content stream per page; `/F1` is Helvetica.
///
/// The MediaBox lives on the page tree root so lookups must walk up to it.
pub fn build_pdf_from_content(contents: &[String]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.clone().into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// The three-page report as a real PDF.
pub fn report_pdf() -> Vec<u8> {
    let pages: Vec<Vec<(&str, f32, f32, f32)>> = vec![
        vec![
            ("Report Title", 72.0, 700.0, 24.0),
            ("Chapter 1", 72.0, 640.0, 18.0),
            ("Page 1 of 3", 280.0, 30.0, 8.0),
        ],
        vec![("Chapter 2", 72.0, 640.0, 18.0), ("Page 2 of 3", 280.0, 30.0, 8.0)],
        vec![("Chapter 3", 72.0, 640.0, 18.0), ("Page 3 of 3", 280.0, 30.0, 8.0)],
    ];
    build_pdf(&pages)
}
