//! PDF decoding: fragment extraction behind a backend trait.

mod backend;
mod extractor;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
    DEFAULT_PAGE_SIZE,
};
pub use extractor::FragmentExtractor;
