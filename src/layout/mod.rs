//! Heading inference: from positioned fragments to a leveled outline.

mod artifacts;
mod builder;
mod classifier;
mod merger;
mod options;
mod pipeline;
mod table_detector;

pub use artifacts::{normalize_key, text_key, ArtifactFilter, ArtifactReport};
pub use builder::build_outline;
pub use classifier::{
    DiscardReason, DocumentStats, HeadingCandidate, HeadingClassifier, Role, SizeStats,
};
pub use merger::{merge_corpus, merge_page};
pub use options::{ArtifactOptions, HeadingOptions, MergeOptions, OutlineConfig, TableOptions};
pub use pipeline::{classify, collect, run, Collection};
pub use table_detector::{TableDetector, TableRegion};
