//! The two-phase outline pipeline.
//!
//! Collection (merge, artifacts, tables, statistics) needs the whole
//! document; classification then runs against the resulting [`Collection`].

use super::artifacts::{ArtifactFilter, ArtifactReport};
use super::builder::build_outline;
use super::classifier::{DocumentStats, HeadingCandidate, HeadingClassifier};
use super::merger::merge_corpus;
use super::options::OutlineConfig;
use super::table_detector::{TableDetector, TableRegion};
use crate::error::Result;
use crate::model::{FragmentCorpus, Line, Outline};

/// Output of the collection phase.
#[derive(Debug, Clone)]
pub struct Collection {
    /// Lines still eligible as headings
    pub lines: Vec<Line>,
    /// Detected table regions
    pub tables: Vec<TableRegion>,
    /// Lines removed as artifacts
    pub artifacts: ArtifactReport,
    /// Lines removed because they sit inside a table
    pub table_excluded: usize,
    /// Corpus-wide font statistics
    pub stats: DocumentStats,
}

/// Phase 1: merge fragments into lines and drop everything that cannot be a heading.
pub fn collect(corpus: &FragmentCorpus, config: &OutlineConfig) -> Result<Collection> {
    let lines = merge_corpus(corpus, &config.merge, config.parallel);
    log::debug!(
        "Merged {} fragments on {} pages into {} lines",
        corpus.fragment_count(),
        corpus.page_count(),
        lines.len()
    );

    let (lines, artifacts) = ArtifactFilter::new(config)?.filter(lines, &corpus.pages);
    log::debug!(
        "Artifacts removed: {} invisible, {} suspicious, {} repeated",
        artifacts.invisible,
        artifacts.suspicious,
        artifacts.repeated
    );

    let detector = TableDetector::new(config.tables.clone());
    let tables = detector.detect(&lines);
    let (lines, excluded) = detector.exclude(lines, &tables);
    log::debug!("Excluded {} lines inside {} tables", excluded.len(), tables.len());

    let stats = DocumentStats::collect(
        &lines,
        corpus.page_count(),
        corpus.first_page(),
        &config.headings,
    );

    Ok(Collection {
        lines,
        tables,
        artifacts,
        table_excluded: excluded.len(),
        stats,
    })
}

/// Phase 2: assign roles to the collected lines.
pub fn classify(collection: &Collection, config: &OutlineConfig) -> Vec<HeadingCandidate> {
    HeadingClassifier::new(&config.headings).classify(&collection.lines, &collection.stats)
}

/// Run the whole pipeline on a fragment corpus.
pub fn run(corpus: &FragmentCorpus, config: &OutlineConfig) -> Result<Outline> {
    config.validate()?;
    let collection = collect(corpus, config)?;
    let candidates = classify(&collection, config);
    Ok(build_outline(&candidates))
}
