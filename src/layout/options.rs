//! Heuristic thresholds for the outline pipeline.
//!
//! Every tunable lives here so a corpus can be re-tuned from one JSON file.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::HeadingLevel;

/// Complete configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Span merging thresholds
    pub merge: MergeOptions,
    /// Invisible text and header/footer detection
    pub artifacts: ArtifactOptions,
    /// Table region detection
    pub tables: TableOptions,
    /// Hierarchy and heading shape rules
    pub headings: HeadingOptions,
    /// Merge pages in parallel
    pub parallel: bool,
}

/// Thresholds for coalescing fragments into lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Max vertical center distance, as a fraction of the smaller font size
    pub baseline_tolerance: f32,
    /// Max horizontal gap, as a multiple of the average character width
    pub contiguity_factor: f32,
    /// Gap (fraction of character width) above which a space is inserted
    pub space_factor: f32,
}

/// Thresholds for artifact removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactOptions {
    /// Fraction of pages a repeated line must appear on
    pub repeat_fraction: f32,
    /// Fraction of the page height treated as the top/bottom margin band
    pub margin_fraction: f32,
    /// Header/footer detection is skipped below this page count
    pub min_pages: usize,
    /// Text below this size is treated as hidden
    pub min_visible_size: f32,
    /// Case-insensitive patterns marking margin text as a footer after 2 pages
    pub footer_patterns: Vec<String>,
}

/// Thresholds for table region detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Minimum aligned rows in a contiguous run
    pub min_rows: usize,
    /// Minimum distinct columns per aligned row
    pub min_columns: usize,
    /// Left edges within this many points share a column
    pub column_tolerance: f32,
    /// Row grouping tolerance, as a fraction of the smaller font size
    pub row_tolerance: f32,
}

/// Hierarchy and heading shape rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingOptions {
    /// Deepest heading level emitted (1..=6)
    pub max_depth: u8,
    /// The largest size may occur at most this often to become the title
    pub title_max_occurrences: usize,
    /// Longer lines are prose, not headings
    pub max_heading_chars: usize,
    /// Lines with fewer non-space characters are list markers or stray glyphs
    pub min_heading_chars: usize,
    /// More periods than this marks a table-of-contents leader line
    pub max_dots: usize,
    /// Average line length at which the dominant size counts as body text
    pub body_min_avg_chars: f32,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            merge: MergeOptions::default(),
            artifacts: ArtifactOptions::default(),
            tables: TableOptions::default(),
            headings: HeadingOptions::default(),
            parallel: true,
        }
    }
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            baseline_tolerance: 0.5,
            contiguity_factor: 3.0,
            space_factor: 0.2,
        }
    }
}

impl Default for ArtifactOptions {
    fn default() -> Self {
        Self {
            repeat_fraction: 0.5,
            margin_fraction: 0.1,
            min_pages: 3,
            min_visible_size: 4.0,
            footer_patterns: vec![
                r"page \d+".to_string(),
                r"\d+ of \d+".to_string(),
                "©".to_string(),
                "copyright".to_string(),
            ],
        }
    }
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            min_rows: 3,
            min_columns: 3,
            column_tolerance: 5.0,
            row_tolerance: 0.5,
        }
    }
}

impl Default for HeadingOptions {
    fn default() -> Self {
        Self {
            max_depth: 4,
            title_max_occurrences: 3,
            max_heading_chars: 150,
            min_heading_chars: 3,
            max_dots: 10,
            body_min_avg_chars: 40.0,
        }
    }
}

impl OutlineConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deepest heading level.
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.headings.max_depth = depth;
        self
    }

    /// Set the page fraction a repeated header/footer must cover.
    pub fn with_repeat_fraction(mut self, fraction: f32) -> Self {
        self.artifacts.repeat_fraction = fraction;
        self
    }

    /// Set the maximum heading length in characters.
    pub fn with_max_heading_chars(mut self, chars: usize) -> Self {
        self.headings.max_heading_chars = chars;
        self
    }

    /// Disable parallel merging.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold is in range.
    pub fn validate(&self) -> Result<()> {
        let fraction = |name: &str, v: f32| {
            if v > 0.0 && v <= 1.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!("{name} must be in (0, 1], got {v}")))
            }
        };
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!("{name} must be positive, got {v}")))
            }
        };

        positive("merge.baseline_tolerance", self.merge.baseline_tolerance)?;
        positive("merge.contiguity_factor", self.merge.contiguity_factor)?;
        positive("merge.space_factor", self.merge.space_factor)?;

        fraction("artifacts.repeat_fraction", self.artifacts.repeat_fraction)?;
        fraction("artifacts.margin_fraction", self.artifacts.margin_fraction)?;
        if self.artifacts.margin_fraction >= 0.5 {
            return Err(Error::InvalidConfig(
                "artifacts.margin_fraction must be below 0.5".to_string(),
            ));
        }
        if !self.artifacts.min_visible_size.is_finite() || self.artifacts.min_visible_size < 0.0 {
            return Err(Error::InvalidConfig(
                "artifacts.min_visible_size must not be negative".to_string(),
            ));
        }
        self.footer_regexes()?;

        positive("tables.column_tolerance", self.tables.column_tolerance)?;
        positive("tables.row_tolerance", self.tables.row_tolerance)?;
        if self.tables.min_rows < 2 || self.tables.min_columns < 2 {
            return Err(Error::InvalidConfig(
                "tables.min_rows and tables.min_columns must be at least 2".to_string(),
            ));
        }

        if HeadingLevel::new(self.headings.max_depth).is_none() {
            return Err(Error::InvalidConfig(format!(
                "headings.max_depth must be in 1..={}, got {}",
                HeadingLevel::MAX,
                self.headings.max_depth
            )));
        }
        if self.headings.max_heading_chars == 0 {
            return Err(Error::InvalidConfig(
                "headings.max_heading_chars must be positive".to_string(),
            ));
        }
        if self.headings.min_heading_chars > self.headings.max_heading_chars {
            return Err(Error::InvalidConfig(format!(
                "headings.min_heading_chars ({}) exceeds headings.max_heading_chars ({})",
                self.headings.min_heading_chars, self.headings.max_heading_chars
            )));
        }

        Ok(())
    }

    /// Compile the footer patterns (case-insensitive).
    pub(crate) fn footer_regexes(&self) -> Result<Vec<Regex>> {
        self.artifacts
            .footer_patterns
            .iter()
            .map(|p| {
                Regex::new(&format!("(?i){p}"))
                    .map_err(|e| Error::InvalidConfig(format!("footer pattern {p:?}: {e}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = OutlineConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.parallel);
        assert_eq!(config.headings.max_depth, 4);
        assert_eq!(config.artifacts.repeat_fraction, 0.5);
        assert_eq!(config.headings.max_heading_chars, 150);
        assert_eq!(config.headings.min_heading_chars, 3);
    }

    #[test]
    fn test_config_builder() {
        let config = OutlineConfig::new()
            .with_max_depth(3)
            .with_repeat_fraction(0.75)
            .with_max_heading_chars(80)
            .sequential();

        assert_eq!(config.headings.max_depth, 3);
        assert_eq!(config.artifacts.repeat_fraction, 0.75);
        assert_eq!(config.headings.max_heading_chars, 80);
        assert!(!config.parallel);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(OutlineConfig::new().with_max_depth(0).validate().is_err());
        assert!(OutlineConfig::new().with_max_depth(7).validate().is_err());
        assert!(OutlineConfig::new().with_repeat_fraction(0.0).validate().is_err());
        assert!(OutlineConfig::new().with_repeat_fraction(1.5).validate().is_err());

        let mut config = OutlineConfig::new();
        config.artifacts.footer_patterns.push("(unclosed".to_string());
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = OutlineConfig::new().with_max_heading_chars(10);
        config.headings.min_heading_chars = 11;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_config() {
        let config =
            OutlineConfig::from_json(r#"{"headings": {"max_depth": 2}, "parallel": false}"#)
                .unwrap();
        assert_eq!(config.headings.max_depth, 2);
        assert_eq!(config.headings.title_max_occurrences, 3);
        assert_eq!(config.tables.min_rows, 3);
        assert!(!config.parallel);
    }

    #[test]
    fn test_invalid_json_config() {
        assert!(OutlineConfig::from_json("{not json").is_err());
        assert!(OutlineConfig::from_json(r#"{"headings": {"max_depth": 9}}"#).is_err());
    }
}
