//! Table detection using text position analysis.
//!
//! Tables are found from alignment alone: rows of lines whose left edges
//! fall into the same column positions, repeated over consecutive rows.
//! No ruling lines are needed.

use std::collections::{BTreeMap, BTreeSet};

use super::options::TableOptions;
use crate::model::{BBox, Line};

/// Slack, in points, when testing whether a line lies inside a region.
const CONTAINMENT_TOLERANCE: f32 = 1.0;

/// A detected grid-aligned block.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRegion {
    /// Page number (1-based)
    pub page: u32,
    /// Union of the member lines
    pub bbox: BBox,
    /// Number of aligned columns
    pub columns: usize,
    /// Number of aligned rows
    pub rows: usize,
}

/// One visual row: lines sharing a vertical center.
struct Row<'a> {
    center: f32,
    size: f32,
    lines: Vec<&'a Line>,
}

/// Detects table regions in merged lines.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableOptions,
}

impl TableDetector {
    /// Create a new table detector with custom configuration.
    pub fn new(config: TableOptions) -> Self {
        Self { config }
    }

    /// Find table regions on every page.
    pub fn detect(&self, lines: &[Line]) -> Vec<TableRegion> {
        let mut by_page: BTreeMap<u32, Vec<&Line>> = BTreeMap::new();
        for line in lines {
            by_page.entry(line.page).or_default().push(line);
        }

        let regions: Vec<TableRegion> = by_page
            .into_iter()
            .flat_map(|(page, lines)| self.detect_page(page, lines))
            .collect();

        log::debug!("TableDetector: found {} table regions", regions.len());
        regions
    }

    /// Split lines into those outside every region and those inside one.
    pub fn exclude(&self, lines: Vec<Line>, regions: &[TableRegion]) -> (Vec<Line>, Vec<Line>) {
        lines.into_iter().partition(|line| {
            !regions
                .iter()
                .any(|r| r.page == line.page && r.bbox.contains(&line.bbox, CONTAINMENT_TOLERANCE))
        })
    }

    fn detect_page(&self, page: u32, mut lines: Vec<&Line>) -> Vec<TableRegion> {
        if lines.len() < self.config.min_rows * self.config.min_columns {
            return vec![];
        }

        lines.sort_by(|a, b| a.bbox.center_y().total_cmp(&b.bbox.center_y()));
        let rows = self.group_into_rows(lines);
        if rows.len() < self.config.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        let row_columns: Vec<BTreeSet<usize>> = rows
            .iter()
            .map(|row| {
                row.lines
                    .iter()
                    .filter_map(|l| column_of(&columns, l.bbox.x0))
                    .collect()
            })
            .collect();

        let mut regions = Vec::new();
        let mut start: Option<usize> = None;
        for i in 0..=rows.len() {
            let aligned = i < rows.len() && row_columns[i].len() >= self.config.min_columns;
            match (aligned, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    if i - s >= self.config.min_rows {
                        regions.push(self.make_region(page, &rows[s..i], &row_columns[s..i]));
                    }
                    start = None;
                }
                _ => {}
            }
        }

        for region in &regions {
            log::debug!(
                "TableDetector: page {} region {}x{} at {:?}",
                region.page,
                region.rows,
                region.columns,
                region.bbox
            );
        }
        regions
    }

    /// Group center-sorted lines into rows.
    fn group_into_rows<'a>(&self, lines: Vec<&'a Line>) -> Vec<Row<'a>> {
        let mut rows: Vec<Row<'a>> = Vec::new();

        for line in lines {
            let center = line.bbox.center_y();
            match rows.last_mut() {
                Some(row)
                    if (center - row.center).abs()
                        <= self.config.row_tolerance * row.size.min(line.font_size) =>
                {
                    row.lines.push(line);
                }
                _ => rows.push(Row {
                    center,
                    size: line.font_size,
                    lines: vec![line],
                }),
            }
        }

        rows
    }

    /// Cluster left edges into columns supported by enough rows.
    ///
    /// Returns the (min, max) extent of each supported column, left to right.
    fn detect_columns(&self, rows: &[Row<'_>]) -> Vec<(f32, f32)> {
        let mut edges: Vec<(f32, usize)> = rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.lines.iter().map(move |l| (l.bbox.x0, i)))
            .collect();
        edges.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut clusters: Vec<(f32, f32, BTreeSet<usize>)> = Vec::new();
        for (x, row) in edges {
            match clusters.last_mut() {
                Some((_, max, hits)) if x - *max <= self.config.column_tolerance => {
                    *max = x;
                    hits.insert(row);
                }
                _ => clusters.push((x, x, BTreeSet::from([row]))),
            }
        }

        clusters
            .into_iter()
            .filter(|(_, _, hits)| hits.len() >= self.config.min_rows)
            .map(|(min, max, _)| (min, max))
            .collect()
    }

    fn make_region(&self, page: u32, rows: &[Row<'_>], row_columns: &[BTreeSet<usize>]) -> TableRegion {
        let mut members = rows.iter().flat_map(|r| r.lines.iter());
        let bbox = members
            .next()
            .map(|first| members.fold(first.bbox, |acc, l| acc.union(&l.bbox)))
            .unwrap_or(BBox::new(0.0, 0.0, 0.0, 0.0));
        let columns: BTreeSet<usize> = row_columns.iter().flatten().copied().collect();

        TableRegion {
            page,
            bbox,
            columns: columns.len(),
            rows: rows.len(),
        }
    }
}

fn column_of(columns: &[(f32, f32)], x: f32) -> Option<usize> {
    columns.iter().position(|&(min, max)| x >= min && x <= max)
}
