//! Data model for outline inference.
//!
//! Fragments come from the decoder, lines are merged from fragments, and the
//! outline is the only artifact that leaves the pipeline.

mod fragment;
mod geometry;
mod line;
mod outline;

pub use fragment::{FillColor, FragmentCorpus, PageLayout, RenderMode, TextFragment};
pub use geometry::BBox;
pub use line::{Line, SizeKey};
pub(crate) use line::is_spaceless_script_char;
pub use outline::{HeadingLevel, Outline, OutlineEntry};
